use crate::{error::Error, http::FilePart};
use glob::Pattern;
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;

const DIR_ENTRIES: &str = "*";

/// Collects every regular file under `root`, opened for reading.
///
/// Entries that cannot be listed or opened are skipped with a warning.
/// Links to files are uploaded, links to directories are never descended into.
/// An empty result is not an error.
pub async fn collect_files(root: impl AsRef<Path>) -> Result<Vec<FilePart>, Error> {
    let root = tokio::fs::canonicalize(root.as_ref()).await?;

    let paths = list_files(&root)?;
    log::debug!("found {} files under {}", paths.len(), root.display());

    Ok(open_files(&root, paths).await)
}

fn list_files(root: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut paths = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let pattern = format!(
            "{}/{}",
            Pattern::escape(&dir.to_string_lossy()),
            DIR_ENTRIES
        );

        for entry in glob::glob(&pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    log::warn!("Skipping {}: {}", err.path().display(), err.error());
                    continue;
                }
            };

            if path.is_dir() {
                if is_symlink(&path) {
                    log::debug!("not descending into linked directory {}", path.display());
                } else {
                    pending.push(path);
                }
            } else if path.is_file() {
                paths.push(path);
            }
        }
    }
    paths.sort();

    Ok(paths)
}

fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .map(|metadata| metadata.file_type().is_symlink())
        .unwrap_or(false)
}

async fn open_files(root: &Path, paths: Vec<PathBuf>) -> Vec<FilePart> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let Some(relative) = relative_path(root, &path) else {
            log::warn!("Skipping file {}: outside of {}", path.display(), root.display());
            continue;
        };

        match open(&path).await {
            Ok((file, len)) => {
                log::debug!("adding file: {} ({} bytes)", relative, len);
                files.push(FilePart::new(relative, file, len));
            }
            Err(err) => log::warn!("Skipping file {}: {}", path.display(), err),
        }
    }

    files
}

async fn open(path: &Path) -> std::io::Result<(File, u64)> {
    let file = File::open(path).await?;
    let len = file.metadata().await?.len();

    Ok((file, len))
}

/// `path` relative to `root`, with segments joined by `/` whatever the host separator.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;

    let segments = relative
        .components()
        .map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<Vec<String>>>()?;

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn should_join_segments_with_forward_slash() {
        let root = PathBuf::from("build");
        let path = root.join("b").join("c");

        assert_eq!(relative_path(&root, &path), Some("b/c".to_string()));
        assert_eq!(
            relative_path(&root, &root.join("a")),
            Some("a".to_string())
        );
    }

    #[test]
    fn should_reject_paths_outside_root() {
        let root = PathBuf::from("build");

        assert_eq!(relative_path(&root, Path::new("dist/a")), None);
        assert_eq!(relative_path(&root, &root), None);
    }

    #[tokio::test]
    async fn should_collect_nested_files() -> Result<()> {
        let dir = TempDir::new("collect")?;
        fs::write(dir.path().join("a"), "a")?;
        fs::create_dir_all(dir.path().join("b"))?;
        fs::write(dir.path().join("b").join("c"), "cc")?;

        let files = collect_files(dir.path()).await?;

        let paths: Vec<&str> = files.iter().map(FilePart::path).collect();
        assert_eq!(paths, vec!["a", "b/c"]);

        drop(files);
        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_include_dot_files_and_skip_directories() -> Result<()> {
        let dir = TempDir::new("collect")?;
        fs::write(dir.path().join(".nojekyll"), "")?;
        fs::create_dir_all(dir.path().join("assets").join("empty"))?;
        fs::write(dir.path().join("assets").join("app.js"), "console.log(1)")?;

        let files = collect_files(dir.path()).await?;

        let paths: Vec<&str> = files.iter().map(FilePart::path).collect();
        assert_eq!(paths, vec![".nojekyll", "assets/app.js"]);

        drop(files);
        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_collect_nothing_from_empty_directory() -> Result<()> {
        let dir = TempDir::new("collect")?;
        fs::create_dir_all(dir.path().join("only").join("dirs"))?;

        let files = collect_files(dir.path()).await?;

        assert!(files.is_empty());

        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_handle_glob_characters_in_root() -> Result<()> {
        let dir = TempDir::new("collect")?;
        let root = dir.path().join("site[1]");
        fs::create_dir_all(&root)?;
        fs::write(root.join("index.html"), "<html></html>")?;

        let files = collect_files(&root).await?;

        let paths: Vec<&str> = files.iter().map(FilePart::path).collect();
        assert_eq!(paths, vec!["index.html"]);

        drop(files);
        dir.close()?;
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn should_not_descend_into_linked_directories() -> Result<()> {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new("collect")?;
        let outside = TempDir::new("outside")?;
        fs::write(outside.path().join("secret"), "secret")?;

        let root = dir.path().join("site");
        fs::create_dir_all(root.join("nested"))?;
        fs::write(root.join("a"), "a")?;
        fs::write(root.join("nested").join("b"), "b")?;
        symlink(&root, root.join("loop"))?;
        symlink(outside.path(), root.join("linked"))?;
        symlink(root.join("a"), root.join("nested").join("alias"))?;

        let files = collect_files(&root).await?;

        let paths: Vec<&str> = files.iter().map(FilePart::path).collect();
        assert_eq!(paths, vec!["a", "nested/alias", "nested/b"]);

        drop(files);
        outside.close()?;
        dir.close()?;
        Ok(())
    }

    #[tokio::test]
    async fn should_skip_files_that_cannot_be_opened() -> Result<()> {
        let dir = TempDir::new("collect")?;
        let root = fs::canonicalize(dir.path())?;
        fs::write(root.join("a"), "a")?;
        fs::write(root.join("c"), "c")?;

        // `b` disappeared between listing and opening
        let paths = vec![root.join("a"), root.join("b"), root.join("c")];
        let files = open_files(&root, paths).await;

        let paths: Vec<&str> = files.iter().map(FilePart::path).collect();
        assert_eq!(paths, vec!["a", "c"]);

        drop(files);
        dir.close()?;
        Ok(())
    }
}
