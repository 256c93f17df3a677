//! Tests for file-backed hosts stores.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::hosts::{END, FieldError, HostEntry, HostsError, HostsFile};

const MIXED_HOSTS: &str = "\
# Loopback\n\
127.0.0.1\tlocalhost\n\
::1         localhost ip6-localhost\n\
\n\
# Lab machines\n\
# (rack 2)\n\
192.168.10.11 host_entry_1 h1\n\
192.168.10.14 host_entry_4  # to be retired\n\
192.168.10.20 mac-mini some_macos\n\
127.0.0.1 local-dev\n";

fn write_hosts(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("hosts");
    fs::write(&path, content).unwrap();
    path
}

mod open {
    use super::*;

    #[test]
    fn loads_entries_with_headers() {
        let dir = TempDir::new().unwrap();
        let hosts = HostsFile::open(write_hosts(&dir, MIXED_HOSTS)).unwrap();
        let entries = hosts.table().entries();

        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].header(), ["# Loopback"]);
        assert_eq!(entries[2].header(), ["# Lab machines", "# (rack 2)"]);
        assert_eq!(entries[3].comment_text(), Some("# to be retired"));
    }

    #[test]
    fn creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new_hosts");

        let hosts = HostsFile::open(&path).unwrap();

        assert!(path.exists());
        assert!(hosts.table().is_empty());
        assert_eq!(hosts.path(), path);
    }

    #[test]
    fn read_only_does_not_create() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent");

        let err = HostsFile::open_read_only(&path).unwrap_err();

        assert!(matches!(err, HostsError::Io { action: "open", .. }));
        assert!(!path.exists());
    }

    #[test]
    fn latin1_comment_is_rejected_and_file_left_intact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts");
        let original: &[u8] = b"# caf\xe9 latin1\r\n1.1.1.1\tone\r\n";
        fs::write(&path, original).unwrap();

        let err = HostsFile::open(&path).unwrap_err();

        assert!(matches!(
            err,
            HostsError::Parse {
                line: Some(1),
                source: FieldError::InvalidEncoding
            }
        ));
        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn malformed_file_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = write_hosts(&dir, "127.0.0.1 localhost\n\n10.0.0.1 bad/name\n");

        let err = HostsFile::open_read_only(path).unwrap_err();

        assert!(matches!(
            err,
            HostsError::Parse {
                line: Some(3),
                source: FieldError::InvalidHostname(_)
            }
        ));
    }
}

mod sync {
    use super::*;

    #[test]
    fn commits_edits_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = write_hosts(&dir, MIXED_HOSTS);
        let hosts = HostsFile::open(&path).unwrap();

        hosts
            .table()
            .add(HostEntry::mapping("10.9.9.9", "added", "new", ["a1"]).unwrap(), END)
            .unwrap();
        hosts.table().delete(0).unwrap();
        let written = hosts.sync().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(written, content.len());
        assert!(!content.contains("# Loopback"));
        assert!(content.starts_with("::1\tlocalhost\tip6-localhost\r\n# Lab machines\r\n"));
        assert!(content.ends_with("10.9.9.9\tadded\ta1\t# new\r\n"));
    }

    #[test]
    fn multiline_comment_cannot_inject_entries() {
        let dir = TempDir::new().unwrap();
        let path = write_hosts(&dir, "1.1.1.1 one\n");
        let hosts = HostsFile::open(&path).unwrap();

        let err = HostEntry::mapping("10.0.0.1", "web", "# note\r\n6.6.6.6 evil", ["w1"]).unwrap_err();
        assert!(matches!(err, HostsError::Validation(FieldError::MultilineComment(_))));

        hosts.sync().unwrap();
        let reopened = HostsFile::open_read_only(&path).unwrap();
        assert_eq!(reopened.table().len(), 1);
    }

    #[test]
    fn synced_file_reloads_identically() {
        let dir = TempDir::new().unwrap();
        let path = write_hosts(&dir, MIXED_HOSTS);
        let hosts = HostsFile::open(&path).unwrap();
        hosts.sync().unwrap();

        let reopened = HostsFile::open_read_only(&path).unwrap();

        assert_eq!(reopened.table().entries(), hosts.table().entries());
        assert_eq!(reopened.table().render(), fs::read_to_string(&path).unwrap());
    }

    #[test]
    fn empty_store_syncs_to_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_hosts(&dir, "1.1.1.1 one\n");
        let hosts = HostsFile::open(&path).unwrap();

        hosts.table().delete(END).unwrap();

        assert_eq!(hosts.sync().unwrap(), 0);
        assert!(fs::read(&path).unwrap().is_empty());
    }

    #[test]
    fn sync_fails_when_file_was_removed() {
        let dir = TempDir::new().unwrap();
        let path = write_hosts(&dir, "1.1.1.1 one\n");
        let hosts = HostsFile::open(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let err = hosts.sync().unwrap_err();
        assert!(matches!(err, HostsError::Io { action: "stat", .. }));
    }
}

mod reload {
    use super::*;

    #[test]
    fn discards_in_memory_edits() {
        let dir = TempDir::new().unwrap();
        let path = write_hosts(&dir, MIXED_HOSTS);
        let hosts = HostsFile::open(&path).unwrap();
        hosts.table().delete(0).unwrap();

        assert_eq!(hosts.reload().unwrap(), 6);
        assert_eq!(hosts.table().len(), 6);
    }

    #[test]
    fn failed_reload_keeps_current_entries() {
        let dir = TempDir::new().unwrap();
        let path = write_hosts(&dir, MIXED_HOSTS);
        let hosts = HostsFile::open(&path).unwrap();
        fs::write(&path, "not-an-address host\n").unwrap();

        assert!(hosts.reload().is_err());
        assert_eq!(hosts.table().len(), 6);
    }
}

mod workflow {
    use super::*;

    /// Copies entries into a fresh file, prunes them by query, and syncs.
    #[test]
    fn copy_prune_and_sync() {
        let dir = TempDir::new().unwrap();
        let source = HostsFile::open_read_only(write_hosts(&dir, MIXED_HOSTS)).unwrap();
        let target_path = dir.path().join("target_hosts");
        let target = HostsFile::open(&target_path).unwrap();

        for entry in source.table().entries() {
            target.table().add(entry, 0).unwrap();
        }

        let table = target.table();
        while let Some(found) = table.get_by_ip("127.0.0.1").unwrap().first() {
            table.delete(isize::try_from(found.position()).unwrap()).unwrap();
        }
        while let Some(found) = table.get_by_hostname("host_entry_4").unwrap().first() {
            table.delete(isize::try_from(found.position()).unwrap()).unwrap();
        }
        if let Some(found) = table.get_by_alias("some_macos").unwrap().first() {
            table.delete(isize::try_from(found.position()).unwrap()).unwrap();
        }

        assert!(fs::read(&target_path).unwrap().is_empty());
        target.sync().unwrap();

        let content = fs::read_to_string(&target_path).unwrap();
        assert_eq!(
            content,
            "# Lab machines\r\n# (rack 2)\r\n192.168.10.11\thost_entry_1\th1\r\n\
             ::1\tlocalhost\tip6-localhost\r\n"
        );
    }
}
