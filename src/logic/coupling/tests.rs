use super::analyzer::{analyze, correlate, pearson, MAX_BUCKETS};
use crate::logic::capture::MotionSample;

/// Energy carried on the x axis so `energy()` returns it unchanged
fn sample(t: f64, energy: f64) -> MotionSample {
    MotionSample::new(t, energy, 0.0, 0.0)
}

fn even_actions(count: usize, span: f64) -> Vec<f64> {
    (0..count).map(|i| i as f64 * span / (count - 1) as f64).collect()
}

#[test]
fn test_linear_energy_matches_analytic_pearson() {
    // 6 actions at 0,2,4,6,8,10 -> buckets [1,0,1,0,1,0,1,0,1,1] (10 lands in the last bucket)
    let actions = even_actions(6, 10.0);
    // 40 samples over [0,10]; energy equals the sample's bucket index
    let motion: Vec<MotionSample> = (0..40)
        .map(|i| {
            let t = i as f64 * 10.0 / 39.0;
            sample(t, t.floor().min(9.0))
        })
        .collect();

    let report = analyze(&actions, &motion).unwrap();
    assert_eq!(report.bucket_count, 10);
    assert_eq!(report.actions_in_window, 6);
    assert_eq!(report.motion_in_window, 40);

    // touch = [1,0,1,0,1,0,1,0,1,1], motion = [0..=9]
    // cov = 29 - 10*0.6*4.5 = 2, var_t = 6 - 3.6 = 2.4, var_m = 285 - 202.5 = 82.5
    let expected = 2.0 / (2.4f64 * 82.5).sqrt();
    assert!((report.correlation - expected).abs() < 1e-12, "got {}", report.correlation);
}

#[test]
fn test_small_magnitude_energy_correlates() {
    // Same fixture as above with energies in the nano range; Pearson is scale free
    let actions = even_actions(6, 10.0);
    let motion: Vec<MotionSample> = (0..40)
        .map(|i| {
            let t = i as f64 * 10.0 / 39.0;
            sample(t, t.floor().min(9.0) * 1e-9)
        })
        .collect();

    let correlation = correlate(&actions, &motion).expect("tiny but varying energy");
    let expected = 2.0 / (2.4f64 * 82.5).sqrt();
    assert!((correlation - expected).abs() < 1e-9, "got {}", correlation);
}

#[test]
fn test_too_few_actions_is_absent() {
    let actions = even_actions(5, 10.0);
    let motion: Vec<MotionSample> = (0..40).map(|i| sample(i as f64 * 0.25, i as f64)).collect();
    assert!(correlate(&actions, &motion).is_none());
}

#[test]
fn test_too_few_motion_samples_is_absent() {
    let actions = even_actions(6, 10.0);
    let motion: Vec<MotionSample> = (0..39).map(|i| sample(i as f64 * 0.26, i as f64)).collect();
    assert!(correlate(&actions, &motion).is_none());
}

#[test]
fn test_constant_energy_is_absent() {
    let actions = even_actions(6, 10.0);
    let motion: Vec<MotionSample> = (0..40).map(|i| sample(i as f64 * 10.0 / 39.0, 1.0)).collect();
    assert!(correlate(&actions, &motion).is_none());
}

#[test]
fn test_short_overlap_is_absent() {
    // Actions span [0,10], motion spans [8,20] -> overlap 2 units
    let actions = even_actions(6, 10.0);
    let motion: Vec<MotionSample> = (0..40).map(|i| sample(8.0 + i as f64 * 0.3, i as f64)).collect();
    assert!(correlate(&actions, &motion).is_none());
}

#[test]
fn test_disjoint_ranges_are_absent() {
    let actions = even_actions(6, 10.0);
    let motion: Vec<MotionSample> = (0..40).map(|i| sample(50.0 + i as f64, i as f64)).collect();
    assert!(correlate(&actions, &motion).is_none());
}

#[test]
fn test_coupled_input_correlates_positively() {
    // Each touch is followed by an energy spike in the same second
    let actions: Vec<f64> = vec![1.2, 3.3, 3.6, 7.1, 7.4, 7.8, 12.5, 15.2];
    let motion: Vec<MotionSample> = (0..200)
        .map(|i| {
            let t = i as f64 * 0.1;
            let near_touch = actions.iter().any(|a| (t - a).abs() < 0.3);
            sample(t, if near_touch { 1.4 } else { 1.0 })
        })
        .collect();

    let r = correlate(&actions, &motion).unwrap();
    assert!(r > 0.5, "expected strong coupling, got {}", r);
}

#[test]
fn test_bucket_count_capped() {
    let actions = even_actions(6, 500.0);
    let motion: Vec<MotionSample> = (0..500).map(|i| sample(i as f64, (i % 7) as f64)).collect();
    let report = analyze(&actions, &motion).unwrap();
    assert_eq!(report.bucket_count, MAX_BUCKETS);
    assert!((-1.0..=1.0).contains(&report.correlation));
}

#[test]
fn test_pearson_edge_cases() {
    assert!(pearson(&[1.0], &[1.0]).is_none());
    assert!(pearson(&[1.0, 2.0], &[1.0]).is_none());
    assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
    assert!(pearson(&[0.1; 7], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).is_none());
    assert!(pearson(&[0.0; 3], &[1.0, 2.0, 3.0]).is_none());
    let r = pearson(&[1e-12, 2e-12, 3e-12], &[2e-12, 4e-12, 6e-12]).unwrap();
    assert!((r - 1.0).abs() < 1e-9);
    let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
    assert!((r + 1.0).abs() < 1e-12);
}
