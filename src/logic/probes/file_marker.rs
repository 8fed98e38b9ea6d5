//! File Marker Probes
//!
//! The same "marker file exists" fact checked through independent primitives,
//! so a hook on one path (e.g. a patched `stat`) shows up as disagreement.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::types::FactProbe;

/// iOS jailbreak artifacts
pub const IOS_JAILBREAK_MARKERS: &[&str] = &[
    "/Applications/Cydia.app",
    "/Applications/Sileo.app",
    "/Applications/Zebra.app",
    "/Library/MobileSubstrate/MobileSubstrate.dylib",
    "/Library/MobileSubstrate/DynamicLibraries",
    "/private/var/lib/apt",
    "/private/var/lib/cydia",
    "/private/var/stash",
    "/usr/sbin/sshd",
    "/etc/apt",
];

/// Android root artifacts
pub const ANDROID_ROOT_MARKERS: &[&str] = &[
    "/system/bin/su",
    "/system/xbin/su",
    "/sbin/su",
    "/data/local/xbin/su",
    "/data/adb/magisk",
    "/sbin/.magisk",
    "/system/framework/XposedBridge.jar",
    "/data/local/tmp/frida-server",
];

/// Android emulator artifacts
pub const EMULATOR_MARKERS: &[&str] = &[
    "/dev/socket/qemud",
    "/dev/qemu_pipe",
    "/system/lib/libc_malloc_debug_qemu.so",
    "/sys/qemu_trace",
    "/system/bin/qemu-props",
];

// ============================================================================
// PRIMITIVES
// ============================================================================

/// `lstat`-style metadata lookup
#[derive(Debug, Clone)]
pub struct MetadataProbe {
    path: PathBuf,
}

impl FactProbe for MetadataProbe {
    fn method(&self) -> &str {
        "metadata"
    }

    fn probe(&self) -> bool {
        fs::symlink_metadata(&self.path).is_ok()
    }
}

/// `open(2)` on the path.
///
/// Only `NotFound` is a "no": sockets (ENXIO), unreadable files and the like
/// still exist. Opened non-blocking so a FIFO never parks the thread.
#[derive(Debug, Clone)]
pub struct OpenProbe {
    path: PathBuf,
}

impl FactProbe for OpenProbe {
    fn method(&self) -> &str {
        "open"
    }

    fn probe(&self) -> bool {
        let mut options = fs::OpenOptions::new();
        options.read(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(O_NONBLOCK);
        }
        match options.open(&self.path) {
            Ok(_) => true,
            Err(e) => e.kind() != io::ErrorKind::NotFound,
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
const O_NONBLOCK: i32 = 0o4000;
#[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
const O_NONBLOCK: i32 = 0x0004;

/// Directory enumeration of the parent, matching by name
#[derive(Debug, Clone)]
pub struct DirScanProbe {
    path: PathBuf,
}

impl FactProbe for DirScanProbe {
    fn method(&self) -> &str {
        "readdir"
    }

    fn probe(&self) -> bool {
        let (Some(parent), Some(name)) = (self.path.parent(), self.path.file_name()) else {
            return false;
        };
        match fs::read_dir(parent) {
            Ok(entries) => entries.flatten().any(|entry| entry.file_name() == name),
            Err(_) => false,
        }
    }
}

/// The three independent primitives for one marker path
pub fn marker_probes(path: impl AsRef<Path>) -> Vec<Arc<dyn FactProbe>> {
    let path = path.as_ref().to_path_buf();
    vec![
        Arc::new(MetadataProbe { path: path.clone() }),
        Arc::new(OpenProbe { path: path.clone() }),
        Arc::new(DirScanProbe { path }),
    ]
}

/// Stable fact id for a marker path ("marker./Applications/Cydia.app" → "marker.applications_cydia_app")
pub fn marker_fact_id(path: &str) -> String {
    let slug: String = path
        .trim_start_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("marker.{}", slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_marker_all_true() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("Cydia.app");
        fs::write(&marker, b"x").unwrap();

        let votes: Vec<bool> = marker_probes(&marker).iter().map(|p| p.probe()).collect();
        assert_eq!(votes, vec![true, true, true]);
    }

    #[test]
    fn test_missing_marker_all_false() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("absent");

        let probes = marker_probes(&marker);
        let methods: Vec<&str> = probes.iter().map(|p| p.method()).collect();
        assert_eq!(methods, vec!["metadata", "open", "readdir"]);
        assert!(probes.iter().all(|p| !p.probe()));
    }

    #[cfg(unix)]
    #[test]
    fn test_socket_marker_all_true() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("qemud");
        let _listener = std::os::unix::net::UnixListener::bind(&marker).unwrap();

        let votes: Vec<bool> = marker_probes(&marker).iter().map(|p| p.probe()).collect();
        assert_eq!(votes, vec![true, true, true]);
    }

    #[cfg(unix)]
    #[test]
    fn test_open_only_not_found_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let probe = OpenProbe { path: dir.path().to_path_buf() };
        assert!(probe.probe());
        assert!(!OpenProbe { path: dir.path().join("absent") }.probe());
    }

    #[test]
    fn test_root_path_is_false_for_scan() {
        let probe = DirScanProbe { path: PathBuf::from("/") };
        assert!(!probe.probe());
    }

    #[test]
    fn test_marker_fact_id() {
        assert_eq!(marker_fact_id("/Applications/Cydia.app"), "marker.applications_cydia_app");
        assert_eq!(marker_fact_id("/sbin/.magisk"), "marker.sbin__magisk");
    }
}
