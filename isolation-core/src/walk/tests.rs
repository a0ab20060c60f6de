use super::*;

use std::collections::HashSet;
use std::fs::{self, File, Permissions};
use std::os::unix::fs::{symlink, PermissionsExt};
use std::os::unix::net::UnixListener;

use nix::errno::Errno;

use pretty_assertions::assert_eq;

use tempfile::TempDir;

fn touch(path: &Path, mode: u32) {
    File::create(path).unwrap();
    fs::set_permissions(path, Permissions::from_mode(mode)).unwrap();
}

// root/
//   top.txt
//   run.sh*
//   a/
//     mid.txt
//     b/
//       c/
//         deep.txt
fn nested_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("top.txt"), 0o644);
    touch(&root.join("run.sh"), 0o755);
    fs::create_dir_all(root.join("a/b/c")).unwrap();
    touch(&root.join("a/mid.txt"), 0o644);
    touch(&root.join("a/b/c/deep.txt"), 0o644);
    dir
}

fn entries(root: &Path, depth: i32) -> HashSet<(String, EntryKind, usize)> {
    walk(root, depth)
        .filter_map(|e| e.ok())
        .map(|e| (e.name, e.kind, e.depth))
        .collect()
}

fn set(items: &[(&str, EntryKind, usize)]) -> HashSet<(String, EntryKind, usize)> {
    items
        .iter()
        .map(|(name, kind, depth)| (name.to_string(), *kind, *depth))
        .collect()
}

#[test]
fn can_access_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!can_access(dir.path().join("does/not/exist")));
}

#[test]
fn can_access_checks_owner_read_bit() {
    let dir = tempfile::tempdir().unwrap();
    let readable = dir.path().join("readable");
    let locked = dir.path().join("locked");
    touch(&readable, 0o400);
    touch(&locked, 0o044);

    assert!(can_access(dir.path()));
    assert!(can_access(&readable));
    assert!(!can_access(&locked));
}

#[test]
fn walk_depth_zero_lists_children_only() {
    use EntryKind::*;

    let dir = nested_tree();
    let expect = set(&[
        ("top.txt", RegularFile, 0),
        ("run.sh", ExecutableFile, 0),
        ("a", Directory, 0),
    ]);
    assert_eq!(expect, entries(dir.path(), 0));
}

#[test]
fn walk_depth_one() {
    use EntryKind::*;

    let dir = nested_tree();
    let expect = set(&[
        ("top.txt", RegularFile, 0),
        ("run.sh", ExecutableFile, 0),
        ("a", Directory, 0),
        ("mid.txt", RegularFile, 1),
        ("b", Directory, 1),
    ]);
    assert_eq!(expect, entries(dir.path(), 1));
}

#[test]
fn walk_never_exceeds_depth() {
    let dir = nested_tree();
    for max in 0..5 {
        for entry in walk(dir.path(), max) {
            let entry = entry.unwrap();
            assert!(entry.depth as i32 <= max, "{:?} deeper than {}", entry, max);
        }
    }

    let deep = ("deep.txt".to_string(), EntryKind::RegularFile, 3);
    assert!(entries(dir.path(), 3).contains(&deep));
    assert!(!entries(dir.path(), 2).contains(&deep));
}

#[test]
fn walk_negative_depth_visits_nothing() {
    let dir = nested_tree();
    assert_eq!(0, walk(dir.path(), -1).count());
    assert_eq!(0, walk(dir.path(), -7).count());
}

#[test]
fn walk_missing_root_visits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(0, walk(dir.path().join("gone"), 3).count());
}

#[test]
fn walk_prunes_unreadable_directory() {
    use EntryKind::*;

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    touch(&locked.join("hidden.txt"), 0o644);
    fs::set_permissions(&locked, Permissions::from_mode(0o311)).unwrap();

    let found = entries(dir.path(), 3);

    fs::set_permissions(&locked, Permissions::from_mode(0o755)).unwrap();
    assert_eq!(set(&[("locked", Directory, 0)]), found);
}

#[test]
fn walk_skips_special_files_and_dangling_links() {
    use EntryKind::*;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("real")).unwrap();
    touch(&root.join("real/inner.txt"), 0o600);
    symlink(root.join("real"), root.join("alias")).unwrap();
    symlink(root.join("nowhere"), root.join("dangling")).unwrap();
    let _listener = UnixListener::bind(root.join("sock")).unwrap();

    let expect = set(&[
        ("real", Directory, 0),
        ("inner.txt", RegularFile, 1),
        ("alias", Directory, 0),
        ("inner.txt", RegularFile, 1),
    ]);
    assert_eq!(expect, entries(root, 1));
    assert_eq!(4, walk(root, 1).filter_map(|e| e.ok()).count());
}

#[test]
fn walk_file_root_is_a_listing_error() {
    let dir = nested_tree();
    let root = dir.path().join("top.txt");

    let items: Vec<_> = walk(&root, 2).collect();
    assert_eq!(1, items.len());
    match &items[0] {
        Err(Error::Listing { path, .. }) => assert_eq!(&root, path),
        other => panic!("expected a listing error, got {:?}", other),
    }
}

#[test]
fn walk_reports_symlink_loop_and_keeps_siblings() {
    use EntryKind::*;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("first.txt"), 0o644);
    touch(&root.join("second.txt"), 0o644);
    symlink(root.join("loop"), root.join("loop")).unwrap();

    let items: Vec<_> = walk(root, 1).collect();
    let failed: Vec<_> = items.iter().filter_map(|e| e.as_ref().err()).collect();
    assert_eq!(1, failed.len());
    match failed[0] {
        Error::Inspect { path, source } => {
            assert_eq!(&root.join("loop"), path);
            assert_eq!(Some(Errno::ELOOP as i32), source.raw_os_error());
        }
        other => panic!("expected an inspect error, got {:?}", other),
    }

    let expect = set(&[("first.txt", RegularFile, 0), ("second.txt", RegularFile, 0)]);
    assert_eq!(expect, entries(root, 1));
}

#[test]
fn walk_is_repeatable() {
    let dir = nested_tree();
    assert_eq!(entries(dir.path(), 8), entries(dir.path(), 8));
}

#[test]
fn entry_display_is_indented() {
    let entry = DirectoryEntry {
        name: "bin".to_string(),
        path: PathBuf::from("/usr/bin"),
        kind: EntryKind::Directory,
        depth: 2,
    };
    assert_eq!("        [Dir] bin", entry.to_string());

    let entry = DirectoryEntry {
        name: "ls".to_string(),
        path: PathBuf::from("/bin/ls"),
        kind: EntryKind::ExecutableFile,
        depth: 0,
    };
    assert_eq!("[Exec] ls", entry.to_string());
}
