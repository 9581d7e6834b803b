//! End-to-end tests for passwd materialization.
//!
//! Each test builds a container root and a session directory in temporary
//! directories, runs the workflow against in-memory collaborators, and
//! checks what was staged and which bind requests were issued.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::path::{Path, PathBuf};

use userbind_common::config::ConfigFile;
use userbind_common::types::IdentityRecord;
use userbind_core::error::MaterializeError;
use userbind_core::filesystem::BindQueue;
use userbind_core::host::{FixedPaths, IdentityProvider, PathLocator, PrivilegeContext};
use userbind_core::passwd::{Host, Outcome, SkipReason, materialize};

const TEMPLATE: &str = "root:x:0:0:root:/root:/bin/bash\nbin:x:1:1:bin:/bin:/sbin/nologin\n";
const ALICE_LINE: &str = "alice:x:1000:1000:Alice User:/home/alice:/bin/sh";

struct Caller(u32);

impl PrivilegeContext for Caller {
    fn real_uid(&self) -> u32 {
        self.0
    }
}

/// Reports paths as-is, without checking they exist.
struct RawPaths {
    root: PathBuf,
    session: PathBuf,
}

impl PathLocator for RawPaths {
    fn container_root(&self) -> Option<PathBuf> {
        Some(self.root.clone())
    }

    fn session_dir(&self) -> Option<PathBuf> {
        Some(self.session.clone())
    }
}

struct FakeIdentity {
    home: Option<PathBuf>,
}

impl FakeIdentity {
    fn alice() -> Self {
        Self {
            home: Some("/home/alice".into()),
        }
    }
}

impl IdentityProvider for FakeIdentity {
    fn lookup(&self, uid: u32) -> std::io::Result<Option<IdentityRecord>> {
        Ok((uid == 1000).then(|| IdentityRecord {
            username: "alice".into(),
            uid: 1000,
            gid: 1000,
            gecos: "Alice User".into(),
            home: "/var/empty".into(),
            shell: "/bin/sh".into(),
        }))
    }

    fn resolve_home(&self, _record: &IdentityRecord) -> Option<PathBuf> {
        self.home.clone()
    }
}

struct Fixture {
    root: tempfile::TempDir,
    session: tempfile::TempDir,
}

impl Fixture {
    fn new(template: Option<&str>) -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let session = tempfile::tempdir().expect("tempdir");
        if let Some(contents) = template {
            std::fs::create_dir_all(root.path().join("etc")).expect("mkdir etc");
            std::fs::write(root.path().join("etc/passwd"), contents).expect("write template");
        }
        Self { root, session }
    }

    fn paths(&self) -> FixedPaths {
        FixedPaths::new(
            Some(self.root.path().to_path_buf()),
            Some(self.session.path().to_path_buf()),
        )
    }

    fn staged(&self) -> PathBuf {
        self.session.path().join("passwd")
    }

    fn run(
        &self,
        uid: u32,
        identity: &FakeIdentity,
        config: &ConfigFile,
        queue: &mut BindQueue,
    ) -> Result<Outcome, MaterializeError> {
        self.run_with_paths(&self.paths(), uid, identity, config, queue)
    }

    fn run_with_paths(
        &self,
        paths: &FixedPaths,
        uid: u32,
        identity: &FakeIdentity,
        config: &ConfigFile,
        queue: &mut BindQueue,
    ) -> Result<Outcome, MaterializeError> {
        let mut cursor = config.cursor();
        let caller = Caller(uid);
        let mut host = Host {
            privilege: &caller,
            identity,
            paths,
            config: &mut cursor,
            binder: queue,
        };
        materialize(&mut host)
    }
}

fn lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("read staged")
        .lines()
        .map(str::to_owned)
        .collect()
}

// ── Skips ────────────────────────────────────────────────────────────

#[test]
fn root_caller_is_a_no_op() {
    let fx = Fixture::new(Some(TEMPLATE));
    let mut queue = BindQueue::new();
    let outcome = fx
        .run(0, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
        .expect("root run");

    assert_eq!(
        outcome,
        Outcome::Skipped {
            reason: SkipReason::RootCaller
        }
    );
    assert!(!fx.staged().exists());
    assert!(queue.requests().is_empty());
}

#[test]
fn root_caller_skips_even_without_paths() {
    let fx = Fixture::new(None);
    let mut queue = BindQueue::new();
    let outcome = fx
        .run_with_paths(
            &FixedPaths::default(),
            0,
            &FakeIdentity::alice(),
            &ConfigFile::default(),
            &mut queue,
        )
        .expect("root run");
    assert!(matches!(outcome, Outcome::Skipped { .. }));
}

#[test]
fn disabled_config_stages_nothing() {
    let fx = Fixture::new(Some(TEMPLATE));
    let config = ConfigFile::parse("config passwd = no\n");
    let mut queue = BindQueue::new();
    let outcome = fx
        .run(1000, &FakeIdentity::alice(), &config, &mut queue)
        .expect("run");

    assert_eq!(
        outcome,
        Outcome::Skipped {
            reason: SkipReason::Disabled
        }
    );
    assert!(!fx.staged().exists());
    assert!(queue.requests().is_empty());
}

#[test]
fn container_without_template_is_left_untouched() {
    let fx = Fixture::new(None);
    let mut queue = BindQueue::new();
    let outcome = fx
        .run(1000, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
        .expect("run");

    assert_eq!(
        outcome,
        Outcome::Skipped {
            reason: SkipReason::NoTemplate
        }
    );
    assert!(!fx.staged().exists());
    assert!(!fx.root.path().join("etc/passwd").exists());
    assert!(queue.requests().is_empty());
}

// ── Materialization ──────────────────────────────────────────────────

#[test]
fn alice_record_is_appended_after_template() {
    let fx = Fixture::new(Some(TEMPLATE));
    let mut queue = BindQueue::new();
    let outcome = fx
        .run(1000, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
        .expect("run");

    assert_eq!(
        lines(&fx.staged()),
        vec![
            "root:x:0:0:root:/root:/bin/bash",
            "bin:x:1:1:bin:/bin:/sbin/nologin",
            ALICE_LINE,
        ]
    );

    let Outcome::BindRequested { request } = outcome else {
        panic!("expected a bind request, got {outcome:?}");
    };
    assert_eq!(request.source, fx.staged());
    assert_eq!(request.destination, PathBuf::from("/etc/passwd"));
    assert_eq!(queue.requests(), &[request]);
}

#[test]
fn template_is_never_modified() {
    let fx = Fixture::new(Some(TEMPLATE));
    let mut queue = BindQueue::new();
    let _ = fx
        .run(1000, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
        .expect("run");
    let template = std::fs::read_to_string(fx.root.path().join("etc/passwd")).expect("read");
    assert_eq!(template, TEMPLATE);
}

#[test]
fn staged_file_has_exactly_one_extra_line() {
    let template: String = (0..25)
        .map(|i| format!("svc{i}:x:{}:{}::/var/svc{i}:/sbin/nologin\n", 100 + i, 100 + i))
        .collect();
    let fx = Fixture::new(Some(&template));
    let mut queue = BindQueue::new();
    let _ = fx
        .run(1000, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
        .expect("run");

    let staged = lines(&fx.staged());
    let original: Vec<&str> = template.lines().collect();
    assert_eq!(staged.len(), original.len() + 1);
    assert_eq!(&staged[..original.len()], original.as_slice());

    let fields: Vec<&str> = staged[original.len()].split(':').collect();
    assert_eq!(fields.len(), 7);
    assert_eq!(fields[1], "x");
}

#[test]
fn rerun_overwrites_instead_of_accumulating() {
    let fx = Fixture::new(Some(TEMPLATE));
    let mut queue = BindQueue::new();
    for _ in 0..2 {
        let _ = fx
            .run(1000, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
            .expect("run");
    }
    let staged = lines(&fx.staged());
    assert_eq!(staged.len(), 3);
    assert_eq!(staged.iter().filter(|l| l.starts_with("alice:")).count(), 1);
}

#[test]
fn template_without_trailing_newline_keeps_last_line() {
    let fx = Fixture::new(Some("root:x:0:0:root:/root:/bin/bash"));
    let mut queue = BindQueue::new();
    let _ = fx
        .run(1000, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
        .expect("run");
    assert_eq!(
        lines(&fx.staged()),
        vec!["root:x:0:0:root:/root:/bin/bash", ALICE_LINE]
    );
}

#[test]
fn explicitly_enabled_config_materializes() {
    let fx = Fixture::new(Some(TEMPLATE));
    let config = ConfigFile::parse("config passwd = yes\n");
    let mut queue = BindQueue::new();
    let outcome = fx
        .run(1000, &FakeIdentity::alice(), &config, &mut queue)
        .expect("run");
    assert!(matches!(outcome, Outcome::BindRequested { .. }));
}

// ── Fatal conditions ─────────────────────────────────────────────────

#[test]
fn home_resolution_failure_aborts_without_bind() {
    let fx = Fixture::new(Some(TEMPLATE));
    let mut queue = BindQueue::new();
    let err = fx
        .run(
            1000,
            &FakeIdentity { home: None },
            &ConfigFile::default(),
            &mut queue,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        MaterializeError::IdentityResolutionFailed { uid: 1000, .. }
    ));
    assert_eq!(err.exit_code(), 255);
    assert!(queue.requests().is_empty());
}

#[test]
fn unknown_user_aborts_without_bind() {
    let fx = Fixture::new(Some(TEMPLATE));
    let mut queue = BindQueue::new();
    let err = fx
        .run(4242, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
        .unwrap_err();
    assert!(matches!(
        err,
        MaterializeError::IdentityResolutionFailed { uid: 4242, .. }
    ));
    assert!(queue.requests().is_empty());
}

#[test]
fn missing_session_dir_aborts() {
    let fx = Fixture::new(Some(TEMPLATE));
    let paths = FixedPaths::new(Some(fx.root.path().to_path_buf()), None);
    let mut queue = BindQueue::new();
    let err = fx
        .run_with_paths(&paths, 1000, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
        .unwrap_err();
    assert!(matches!(err, MaterializeError::MissingSessionDir));
    assert!(queue.requests().is_empty());
}

#[test]
fn missing_container_dir_aborts() {
    let fx = Fixture::new(Some(TEMPLATE));
    let paths = FixedPaths::new(None, Some(fx.session.path().to_path_buf()));
    let mut queue = BindQueue::new();
    let err = fx
        .run_with_paths(&paths, 1000, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
        .unwrap_err();
    assert!(matches!(err, MaterializeError::MissingContainerDir));
}

#[test]
fn staging_into_vanished_session_dir_is_copy_failure() {
    let fx = Fixture::new(Some(TEMPLATE));
    let paths = RawPaths {
        root: fx.root.path().to_path_buf(),
        session: fx.session.path().join("vanished"),
    };
    let config = ConfigFile::default();
    let mut cursor = config.cursor();
    let mut queue = BindQueue::new();
    let caller = Caller(1000);
    let identity = FakeIdentity::alice();
    let mut host = Host {
        privilege: &caller,
        identity: &identity,
        paths: &paths,
        config: &mut cursor,
        binder: &mut queue,
    };

    let err = materialize(&mut host).unwrap_err();
    assert!(matches!(err, MaterializeError::CopyFailed { .. }));
    assert!(queue.requests().is_empty());
}

#[cfg(unix)]
#[test]
fn host_passwd_behind_symlinked_etc_is_never_staged() {
    let host = tempfile::tempdir().expect("tempdir");
    std::fs::write(host.path().join("passwd"), "hostonly:x:5:5::/:/bin/sh\n").expect("write");
    let fx = Fixture::new(None);
    std::os::unix::fs::symlink(host.path(), fx.root.path().join("etc")).expect("symlink");

    let mut queue = BindQueue::new();
    let outcome = fx
        .run(1000, &FakeIdentity::alice(), &ConfigFile::default(), &mut queue)
        .expect("run");

    assert_eq!(
        outcome,
        Outcome::Skipped {
            reason: SkipReason::NoTemplate
        }
    );
    assert!(!fx.staged().exists());
    assert!(queue.requests().is_empty());
}
