use super::*;
use crate::foundation::error::FrameinkError;

const CANVAS: Canvas = Canvas {
    width: 800,
    height: 600,
};

struct BrokenStore;

impl ProjectStore for BrokenStore {
    fn load(&self) -> FrameinkResult<Option<String>> {
        Err(FrameinkError::Other(anyhow::anyhow!("storage unavailable")))
    }

    fn save(&mut self, _json: &str) -> FrameinkResult<()> {
        Err(FrameinkError::Other(anyhow::anyhow!("quota exceeded")))
    }
}

#[test]
fn memory_store_round_trips_a_project() {
    let mut p = Project::default();
    p.add_layer(None);
    let mut store = MemoryStore::new();
    assert_eq!(load_project(&store, CANVAS), Project::default());

    assert!(save_project(&mut store, &p));
    assert_eq!(store.save_count(), 1);
    assert_eq!(load_project(&store, CANVAS).layers().len(), 2);
}

#[test]
fn broken_store_degrades_without_error() {
    let mut store = BrokenStore;
    assert!(!save_project(&mut store, &Project::default()));
    assert_eq!(load_project(&store, CANVAS), Project::default());
}

#[test]
fn garbage_contents_load_as_fresh_project() {
    let store = MemoryStore::with_contents("{\"version\": \"0.1\"}");
    let small = Canvas::new(64, 48).unwrap();
    assert_eq!(load_project(&store, small), Project::new(small));
}

#[test]
fn file_store_writes_and_reads_back() {
    let dir = std::env::temp_dir().join(format!("frameink_store_{}", std::process::id()));
    let path = dir.join("nested").join("project.json");
    let _ = std::fs::remove_dir_all(&dir);

    let mut store = FileStore::new(&path);
    assert!(store.load().unwrap().is_none());

    let mut p = Project::default();
    p.set_fps(24).unwrap();
    assert!(save_project(&mut store, &p));
    assert!(path.exists());
    assert_eq!(load_project(&store, CANVAS).fps.0, 24);

    let _ = std::fs::remove_dir_all(&dir);
}
