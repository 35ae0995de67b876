use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

/// Per-test scratch directory for frame JSON records, removed on drop.  The
/// process id is part of the path so concurrent `cargo test` runs don't share
/// a directory.
pub struct ScratchFrameDir {
    path: PathBuf,
}

impl ScratchFrameDir {
    pub fn new(test_name: &str) -> Self {
        let path = env::temp_dir().join(format!("{}-{}", test_name, process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).unwrap();
        ScratchFrameDir { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` as the record file for `frame`, i.e. `<frame>.json`.
    pub fn write_frame(&self, frame: &str, contents: &str) {
        self.write_file(&format!("{}.json", frame), contents);
    }

    pub fn write_file(&self, file_name: &str, contents: &str) {
        fs::write(self.path.join(file_name), contents).unwrap();
    }
}

impl Drop for ScratchFrameDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
