use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sprig_graph::{commit_tree, get_commit, log, Commit, Log, RefGraph};
use sprig_refs::{
    validate_branch_name, validate_tag_name, FsRefStore, RefStore, RefValue, HEAD, HEADS_PREFIX,
    TAGS_PREFIX,
};
use sprig_store::{FsObjectStore, ObjectKind, ObjectStore, StoreError};
use sprig_tree::IgnoreSet;
use sprig_types::ObjectId;
use tracing::{debug, info};

use crate::config::{RepoConfig, CONFIG_FILE};
use crate::error::{SdkError, SdkResult};

/// Name of the repository metadata directory inside a working directory.
pub const META_DIR: &str = ".sprig";

/// A branch and the commit it points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
    pub name: String,
    pub id: ObjectId,
    /// HEAD is symbolic to this branch.
    pub current: bool,
}

/// A tag and the object it points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagInfo {
    pub name: String,
    pub id: ObjectId,
}

/// Handle on a working directory and its `.sprig` metadata.
///
/// Every operation goes through the paths held here; nothing depends on the
/// process's current directory.
#[derive(Debug)]
pub struct Repository {
    workdir: PathBuf,
    meta_dir: PathBuf,
    config: RepoConfig,
    store: FsObjectStore,
    refs: FsRefStore,
}

impl Repository {
    /// Create the repository layout under `workdir` and open it.
    ///
    /// Running this on an existing repository keeps its config and HEAD.
    pub fn init(workdir: impl Into<PathBuf>) -> SdkResult<Self> {
        let workdir = workdir.into();
        let meta_dir = workdir.join(META_DIR);
        fs::create_dir_all(meta_dir.join("objects"))?;
        fs::create_dir_all(meta_dir.join(HEADS_PREFIX))?;
        fs::create_dir_all(meta_dir.join(TAGS_PREFIX))?;

        let config_path = meta_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            RepoConfig::default().save(&config_path)?;
        }

        let repo = Self::open(&workdir)?;
        if repo.refs.read_raw(HEAD)?.is_none() {
            let branch = &repo.config.default_branch;
            validate_branch_name(branch)?;
            repo.refs.set_ref(
                HEAD,
                &RefValue::symbolic(format!("{HEADS_PREFIX}{branch}")),
                false,
            )?;
            info!(path = %repo.meta_dir.display(), branch = %branch, "initialized repository");
        } else {
            info!(path = %repo.meta_dir.display(), "reinitialized existing repository");
        }
        Ok(repo)
    }

    /// Open the repository whose metadata lives in `workdir/.sprig`.
    pub fn open(workdir: impl Into<PathBuf>) -> SdkResult<Self> {
        let workdir = workdir.into();
        let meta_dir = workdir.join(META_DIR);
        if !meta_dir.is_dir() {
            return Err(SdkError::NotInitialized(workdir));
        }
        let config = RepoConfig::load(&meta_dir.join(CONFIG_FILE))?;
        let store = FsObjectStore::open(meta_dir.join("objects"))?;
        let refs = FsRefStore::new(&meta_dir);
        debug!(workdir = %workdir.display(), "opened repository");
        Ok(Self {
            workdir,
            meta_dir,
            config,
            store,
            refs,
        })
    }

    /// Open the nearest repository at or above `start`.
    pub fn discover(start: impl AsRef<Path>) -> SdkResult<Self> {
        let start = start.as_ref();
        for dir in start.ancestors() {
            if dir.join(META_DIR).is_dir() {
                return Self::open(dir);
            }
        }
        Err(SdkError::NotInitialized(start.to_path_buf()))
    }

    // ---- Accessors ----

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn meta_dir(&self) -> &Path {
        &self.meta_dir
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn store(&self) -> &FsObjectStore {
        &self.store
    }

    pub fn refs(&self) -> &FsRefStore {
        &self.refs
    }

    /// Names excluded from trees: the metadata dir, `.git`, and configured extras.
    pub fn ignore_set(&self) -> IgnoreSet {
        IgnoreSet::new(META_DIR).with_names(self.config.ignore.iter().cloned())
    }

    // ---- Objects ----

    /// Store the contents of `path` as a blob.
    pub fn hash_object(&self, path: impl AsRef<Path>) -> SdkResult<ObjectId> {
        let data = fs::read(path.as_ref())?;
        self.hash_bytes(ObjectKind::Blob, &data)
    }

    /// Store `data` under `kind`.
    pub fn hash_bytes(&self, kind: ObjectKind, data: &[u8]) -> SdkResult<ObjectId> {
        Ok(self.store.put(kind, data)?)
    }

    /// Payload of the object `rev` names, optionally checking its kind.
    pub fn cat_object(&self, rev: &str, expected: Option<ObjectKind>) -> SdkResult<Vec<u8>> {
        let id = self.resolve(rev)?;
        Ok(self.store.get(&id, expected)?)
    }

    /// Turn a ref name, short ref name, `@`, empty string or hex id into an id.
    pub fn resolve(&self, rev: &str) -> SdkResult<ObjectId> {
        Ok(self.refs.resolve(rev)?)
    }

    /// Like [`Repository::resolve`], but the object must be in the store.
    fn resolve_existing(&self, rev: &str) -> SdkResult<ObjectId> {
        let id = self.resolve(rev)?;
        if !self.store.exists(&id)? {
            return Err(StoreError::NotFound(id).into());
        }
        Ok(id)
    }

    // ---- Trees ----

    /// Snapshot the working directory into the store.
    pub fn write_tree(&self) -> SdkResult<ObjectId> {
        Ok(sprig_tree::write_tree(
            &self.store,
            &self.workdir,
            &self.ignore_set(),
        )?)
    }

    /// Replace the working directory with the tree `rev` names.
    ///
    /// A commit is accepted and stands for its tree.
    pub fn read_tree(&self, rev: &str) -> SdkResult<ObjectId> {
        let id = self.resolve(rev)?;
        let tree = match self.store.load(&id)?.kind {
            ObjectKind::Commit => get_commit(&self.store, &id)?.tree,
            _ => id,
        };
        sprig_tree::read_tree(&self.store, &tree, &self.workdir, &self.ignore_set())?;
        Ok(tree)
    }

    // ---- Commits ----

    /// Snapshot the working directory and commit it on top of HEAD.
    pub fn commit(&self, message: &str) -> SdkResult<ObjectId> {
        let tree = self.write_tree()?;
        Ok(commit_tree(&self.store, &self.refs, &tree, message)?)
    }

    pub fn get_commit(&self, rev: &str) -> SdkResult<Commit> {
        let id = self.resolve(rev)?;
        Ok(get_commit(&self.store, &id)?)
    }

    /// History from `rev`, newest first, decorated with ref names.
    pub fn log(&self, rev: &str) -> SdkResult<Log<'_>> {
        let start = self.resolve(rev)?;
        Ok(log(&self.store, &self.refs, start)?)
    }

    /// Check out `name` into the working directory and move HEAD.
    ///
    /// A branch name leaves HEAD tracking that branch and checks out the
    /// branch's commit, even when a tag of the same name exists. Anything
    /// else (tag, hex id, `HEAD`) detaches HEAD at the resolved commit.
    pub fn checkout(&self, name: &str) -> SdkResult<ObjectId> {
        let (id, head) = if self.refs.is_branch(name)? {
            let branch = format!("{HEADS_PREFIX}{name}");
            (self.refs.peel(&branch)?, RefValue::symbolic(branch))
        } else {
            let id = self.resolve(name)?;
            (id, RefValue::direct(id))
        };
        let commit = get_commit(&self.store, &id)?;
        sprig_tree::read_tree(&self.store, &commit.tree, &self.workdir, &self.ignore_set())?;

        self.refs.set_ref(HEAD, &head, false)?;
        info!(rev = name, commit = %id.short_hex(), head = %head, "checked out");
        Ok(id)
    }

    // ---- Refs ----

    /// Point `refs/tags/<name>` at `rev`, creating or moving the tag.
    pub fn tag(&self, name: &str, rev: &str) -> SdkResult<ObjectId> {
        validate_tag_name(name)?;
        let id = self.resolve_existing(rev)?;
        self.refs
            .set_ref(&format!("{TAGS_PREFIX}{name}"), &RefValue::direct(id), false)?;
        info!(tag = name, object = %id.short_hex(), "tagged");
        Ok(id)
    }

    /// Point `refs/heads/<name>` at `rev`.
    pub fn create_branch(&self, name: &str, rev: &str) -> SdkResult<ObjectId> {
        validate_branch_name(name)?;
        let id = self.resolve_existing(rev)?;
        self.refs
            .set_ref(&format!("{HEADS_PREFIX}{name}"), &RefValue::direct(id), false)?;
        info!(branch = name, commit = %id.short_hex(), "created branch");
        Ok(id)
    }

    /// The branch HEAD tracks, or `None` when detached.
    pub fn current_branch(&self) -> SdkResult<Option<String>> {
        Ok(self.refs.current_branch()?)
    }

    /// Every branch with a commit, by short name.
    pub fn branches(&self) -> SdkResult<Vec<BranchInfo>> {
        let current = self.current_branch()?;
        let mut out = Vec::new();
        for (full, value) in self.refs.branches()? {
            let id = value.object_id(&full)?;
            let name = full.strip_prefix(HEADS_PREFIX).unwrap_or(&full).to_string();
            let is_current = current.as_deref() == Some(name.as_str());
            out.push(BranchInfo {
                name,
                id,
                current: is_current,
            });
        }
        Ok(out)
    }

    /// Every tag, by short name.
    pub fn tags(&self) -> SdkResult<Vec<TagInfo>> {
        let mut out = Vec::new();
        for (full, value) in self.refs.tags()? {
            let id = value.object_id(&full)?;
            let name = full.strip_prefix(TAGS_PREFIX).unwrap_or(&full).to_string();
            out.push(TagInfo { name, id });
        }
        Ok(out)
    }

    /// All refs and the commits reachable from them.
    pub fn ref_graph(&self) -> SdkResult<RefGraph> {
        Ok(RefGraph::build(&self.store, &self.refs)?)
    }
}

#[cfg(test)]
mod tests {
    use sprig_refs::{Head, RefError};

    use super::*;

    fn setup() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn write(repo: &Repository, path: &str, content: &str) {
        let full = repo.workdir().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn read(repo: &Repository, path: &str) -> String {
        fs::read_to_string(repo.workdir().join(path)).unwrap()
    }

    #[test]
    fn init_creates_layout() {
        let (dir, repo) = setup();
        let meta = dir.path().join(".sprig");
        assert!(meta.join("objects").is_dir());
        assert!(meta.join("refs/heads").is_dir());
        assert!(meta.join("refs/tags").is_dir());
        assert!(meta.join("config.toml").is_file());
        assert_eq!(
            fs::read_to_string(meta.join("HEAD")).unwrap(),
            "ref: refs/heads/master"
        );
        assert_eq!(repo.current_branch().unwrap().as_deref(), Some("master"));
    }

    #[test]
    fn init_is_idempotent() {
        let (dir, repo) = setup();
        write(&repo, "a.txt", "a");
        let c1 = repo.commit("one").unwrap();
        repo.checkout(&c1.to_hex()).unwrap();

        let again = Repository::init(dir.path()).unwrap();
        assert_eq!(again.refs().head().unwrap(), Some(Head::Detached(c1)));
    }

    #[test]
    fn init_honors_configured_default_branch() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".sprig")).unwrap();
        RepoConfig {
            default_branch: "trunk".into(),
            ignore: Vec::new(),
        }
        .save(&dir.path().join(".sprig/config.toml"))
        .unwrap();

        let repo = Repository::init(dir.path()).unwrap();
        assert_eq!(repo.current_branch().unwrap().as_deref(), Some("trunk"));
    }

    #[test]
    fn open_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Repository::open(dir.path()),
            Err(SdkError::NotInitialized(_))
        ));
        assert!(matches!(
            Repository::discover(dir.path()),
            Err(SdkError::NotInitialized(_))
        ));
    }

    #[test]
    fn discover_walks_up() {
        let (dir, _repo) = setup();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        let found = Repository::discover(&nested).unwrap();
        assert_eq!(found.workdir(), dir.path());
    }

    #[test]
    fn hash_object_and_cat() {
        let (dir, repo) = setup();
        fs::write(dir.path().join("f"), "payload").unwrap();
        let id = repo.hash_object(dir.path().join("f")).unwrap();
        assert!(dir.path().join(".sprig/objects").join(id.to_hex()).is_file());
        assert_eq!(
            repo.cat_object(&id.to_hex(), Some(ObjectKind::Blob)).unwrap(),
            b"payload"
        );
        assert!(matches!(
            repo.cat_object(&id.to_hex(), Some(ObjectKind::Tree)),
            Err(SdkError::Store(sprig_store::StoreError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn first_and_second_commit_chain() {
        let (_dir, repo) = setup();
        write(&repo, "file.txt", "v1");
        let first = repo.commit("a").unwrap();
        write(&repo, "file.txt", "v2");
        let second = repo.commit("b").unwrap();

        let c1 = repo.get_commit(&first.to_hex()).unwrap();
        let c2 = repo.get_commit(&second.to_hex()).unwrap();
        assert_eq!(c1.parent, None);
        assert_eq!(c2.parent, Some(first));
        assert_ne!(c1.tree, c2.tree);
        assert_eq!(repo.resolve("master").unwrap(), second);
        assert_eq!(repo.resolve("@").unwrap(), second);
        assert_eq!(repo.resolve("").unwrap(), second);

        let history: Vec<_> = repo
            .log("")
            .unwrap()
            .map(|e| e.unwrap().commit.id)
            .collect();
        assert_eq!(history, [second, first]);
    }

    #[test]
    fn branch_and_checkout_keep_head_symbolic() {
        let (_dir, repo) = setup();
        write(&repo, "file.txt", "base");
        let base = repo.commit("base").unwrap();

        repo.create_branch("feature", "@").unwrap();
        repo.checkout("feature").unwrap();
        assert_eq!(repo.current_branch().unwrap().as_deref(), Some("feature"));

        write(&repo, "file.txt", "feature work");
        let tip = repo.commit("on feature").unwrap();
        assert_eq!(repo.resolve("feature").unwrap(), tip);
        assert_eq!(repo.resolve("master").unwrap(), base);

        repo.checkout("master").unwrap();
        assert_eq!(read(&repo, "file.txt"), "base");
        assert_eq!(repo.current_branch().unwrap().as_deref(), Some("master"));

        let branches = repo.branches().unwrap();
        let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["feature", "master"]);
        assert!(branches[1].current);
        assert!(!branches[0].current);
    }

    #[test]
    fn tag_resolves_by_short_and_full_name() {
        let (_dir, repo) = setup();
        write(&repo, "x", "x");
        let c = repo.commit("tagged").unwrap();
        repo.tag("v1", "").unwrap();

        assert_eq!(repo.resolve("v1").unwrap(), c);
        assert_eq!(repo.resolve("refs/tags/v1").unwrap(), c);
        assert_eq!(
            repo.tags().unwrap(),
            [TagInfo {
                name: "v1".into(),
                id: c
            }]
        );
    }

    #[test]
    fn checkout_of_hash_detaches_head() {
        let (_dir, repo) = setup();
        write(&repo, "file.txt", "one");
        let first = repo.commit("one").unwrap();
        write(&repo, "file.txt", "two");
        write(&repo, "extra.txt", "extra");
        repo.commit("two").unwrap();

        repo.checkout(&first.to_hex()).unwrap();
        assert_eq!(repo.refs().head().unwrap(), Some(Head::Detached(first)));
        assert_eq!(repo.current_branch().unwrap(), None);
        assert_eq!(read(&repo, "file.txt"), "one");
        assert!(!repo.workdir().join("extra.txt").exists());

        // A commit while detached moves only HEAD.
        write(&repo, "file.txt", "detached");
        let detached = repo.commit("detached").unwrap();
        assert_eq!(repo.resolve("HEAD").unwrap(), detached);
        assert_ne!(repo.resolve("master").unwrap(), detached);
    }

    #[test]
    fn checkout_by_tag_detaches() {
        let (_dir, repo) = setup();
        write(&repo, "f", "1");
        let c = repo.commit("1").unwrap();
        repo.tag("release", "@").unwrap();
        repo.checkout("release").unwrap();
        assert_eq!(repo.refs().head().unwrap(), Some(Head::Detached(c)));
    }

    #[test]
    fn checkout_prefers_branch_over_tag_of_same_name() {
        let (_dir, repo) = setup();
        write(&repo, "f", "old");
        let old = repo.commit("old").unwrap();
        repo.tag("dev", "@").unwrap();
        write(&repo, "f", "new");
        let new = repo.commit("new").unwrap();
        repo.create_branch("dev", "@").unwrap();
        repo.checkout(&old.to_hex()).unwrap();

        assert_eq!(repo.checkout("dev").unwrap(), new);
        assert_eq!(
            repo.refs().head().unwrap(),
            Some(Head::Symbolic("refs/heads/dev".into()))
        );
        assert_eq!(read(&repo, "f"), "new");

        // The next commit builds on the branch tip, not the tag.
        write(&repo, "g", "more");
        let next = repo.commit("more").unwrap();
        assert_eq!(repo.get_commit("refs/heads/dev").unwrap().parent, Some(new));
        assert_eq!(repo.resolve("refs/heads/dev").unwrap(), next);
        assert_eq!(repo.resolve("refs/tags/dev").unwrap(), old);
    }

    #[test]
    fn refs_to_unknown_objects_are_rejected() {
        let (_dir, repo) = setup();
        let ghost = ObjectId::from_hash([0x42; 20]);
        assert!(matches!(
            repo.tag("ghost", &ghost.to_hex()),
            Err(SdkError::Store(StoreError::NotFound(id))) if id == ghost
        ));
        assert!(matches!(
            repo.create_branch("ghost", &ghost.to_hex()),
            Err(SdkError::Store(StoreError::NotFound(_)))
        ));
        assert!(repo.tags().unwrap().is_empty());
        assert!(repo.ref_graph().is_ok());
    }

    #[test]
    fn read_tree_accepts_commit_or_tree() {
        let (_dir, repo) = setup();
        write(&repo, "keep.txt", "keep");
        let commit = repo.commit("snapshot").unwrap();
        let tree = repo.get_commit("").unwrap().tree;

        write(&repo, "keep.txt", "changed");
        write(&repo, "new.txt", "new");
        assert_eq!(repo.read_tree(&commit.to_hex()).unwrap(), tree);
        assert_eq!(read(&repo, "keep.txt"), "keep");
        assert!(!repo.workdir().join("new.txt").exists());

        write(&repo, "keep.txt", "again");
        assert_eq!(repo.read_tree(&tree.to_hex()).unwrap(), tree);
        assert_eq!(read(&repo, "keep.txt"), "keep");
    }

    #[test]
    fn write_tree_skips_configured_ignores() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".sprig")).unwrap();
        RepoConfig {
            default_branch: "master".into(),
            ignore: vec!["target".into()],
        }
        .save(&dir.path().join(".sprig/config.toml"))
        .unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        write(&repo, "src.rs", "code");
        let clean = repo.write_tree().unwrap();
        write(&repo, "target/out.bin", "artifact");
        assert_eq!(repo.write_tree().unwrap(), clean);
    }

    #[test]
    fn bad_names_are_rejected() {
        let (_dir, repo) = setup();
        write(&repo, "f", "1");
        repo.commit("1").unwrap();
        assert!(matches!(
            repo.create_branch("bad..name", "@"),
            Err(SdkError::Ref(RefError::InvalidRefName { .. }))
        ));
        assert!(matches!(
            repo.tag("has space", "@"),
            Err(SdkError::Ref(RefError::InvalidRefName { .. }))
        ));
    }

    #[test]
    fn unborn_head_has_no_history() {
        let (_dir, repo) = setup();
        assert!(matches!(
            repo.log(""),
            Err(SdkError::Ref(RefError::NotFound { .. }))
        ));
        assert!(repo.branches().unwrap().is_empty());
    }

    #[test]
    fn ref_graph_lists_everything() {
        let (_dir, repo) = setup();
        write(&repo, "f", "1");
        let a = repo.commit("a").unwrap();
        write(&repo, "f", "2");
        let b = repo.commit("b").unwrap();
        repo.tag("v1", &a.to_hex()).unwrap();

        let graph = repo.ref_graph().unwrap();
        let ids: Vec<_> = graph.commits.iter().map(|c| c.id).collect();
        assert!(ids.contains(&a) && ids.contains(&b));
        assert_eq!(ids.len(), 2);
        assert!(graph.to_dot().contains("\"refs/tags/v1\" [shape=note]"));
    }
}
