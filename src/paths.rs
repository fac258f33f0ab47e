use directories::ProjectDirs;
use std::path::PathBuf;

pub(crate) fn default_entries_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "tallysheet")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("entries.toml");
    Some(path)
}
