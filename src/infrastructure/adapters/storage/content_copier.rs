//! Content Copier - 文件系统目录复制实现
//!
//! 实现 ContentCopierPort trait

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ContentCopierPort, CopyError, CopyStats};

/// 文件系统目录复制器
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentCopier;

impl FsContentCopier {
    pub fn new() -> Self {
        Self
    }
}

fn copy_error(path: &Path, err: io::Error) -> CopyError {
    let message = format!("{}: {}", path.display(), err);
    match err.kind() {
        io::ErrorKind::PermissionDenied => CopyError::PermissionDenied(message),
        _ => CopyError::Io(message),
    }
}

#[async_trait]
impl ContentCopierPort for FsContentCopier {
    async fn copy_tree(&self, from: &Path, to: &Path) -> Result<CopyStats, CopyError> {
        match fs::metadata(from).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(CopyError::SourceNotFound(from.display().to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CopyError::SourceNotFound(from.display().to_string()))
            }
            Err(e) => return Err(copy_error(from, e)),
        }

        if fs::try_exists(to).await.map_err(|e| copy_error(to, e))? {
            return Err(CopyError::DestinationExists(to.display().to_string()));
        }

        let mut stats = CopyStats::default();
        let root = fs::canonicalize(from)
            .await
            .map_err(|e| copy_error(from, e))?;
        // 每个待复制目录携带其祖先的真实路径，用于识别指回祖先的符号链接
        let mut pending: Vec<(PathBuf, PathBuf, Vec<PathBuf>)> =
            vec![(from.to_path_buf(), to.to_path_buf(), vec![root])];

        while let Some((source_dir, target_dir, ancestors)) = pending.pop() {
            fs::create_dir_all(&target_dir)
                .await
                .map_err(|e| copy_error(&target_dir, e))?;
            stats.directories += 1;

            let mut entries = fs::read_dir(&source_dir)
                .await
                .map_err(|e| copy_error(&source_dir, e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| copy_error(&source_dir, e))?
            {
                let source = entry.path();
                let target = target_dir.join(entry.file_name());
                let mut file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| copy_error(&source, e))?;
                if file_type.is_symlink() {
                    file_type = fs::metadata(&source)
                        .await
                        .map_err(|e| copy_error(&source, e))?
                        .file_type();
                }

                if file_type.is_dir() {
                    let real = fs::canonicalize(&source)
                        .await
                        .map_err(|e| copy_error(&source, e))?;
                    if ancestors.contains(&real) {
                        return Err(CopyError::Io(format!(
                            "{}: symlink loops back to {}",
                            source.display(),
                            real.display()
                        )));
                    }
                    let mut chain = ancestors.clone();
                    chain.push(real);
                    pending.push((source, target, chain));
                } else {
                    stats.bytes += fs::copy(&source, &target)
                        .await
                        .map_err(|e| copy_error(&source, e))?;
                    stats.files += 1;
                }
            }
        }

        tracing::debug!(
            from = %from.display(),
            to = %to.display(),
            files = stats.files,
            bytes = stats.bytes,
            "Copied content tree"
        );

        Ok(stats)
    }

    async fn remove_tree(&self, path: &Path) -> Result<(), CopyError> {
        match fs::remove_dir_all(path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed content tree");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(copy_error(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn sample_tree(root: &Path) {
        fs::create_dir_all(root.join("css/theme")).await.unwrap();
        fs::write(root.join("index.html"), b"<html></html>").await.unwrap();
        fs::write(root.join("css/site.css"), b"body{}").await.unwrap();
        fs::write(root.join("css/theme/dark.css"), b"").await.unwrap();
    }

    #[tokio::test]
    async fn test_copy_tree() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("shop");
        let to = temp.path().join("shop8081");
        sample_tree(&from).await;

        let stats = FsContentCopier::new().copy_tree(&from, &to).await.unwrap();

        assert_eq!(stats.directories, 3);
        assert_eq!(stats.files, 3);
        assert_eq!(stats.bytes, 13 + 6);
        assert_eq!(
            fs::read(to.join("css/site.css")).await.unwrap(),
            b"body{}".to_vec()
        );
        assert!(to.join("css/theme/dark.css").exists());
    }

    #[tokio::test]
    async fn test_copy_tree_rejects_existing_destination() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("shop");
        let to = temp.path().join("taken");
        sample_tree(&from).await;
        fs::create_dir_all(&to).await.unwrap();

        let result = FsContentCopier::new().copy_tree(&from, &to).await;
        assert!(matches!(result, Err(CopyError::DestinationExists(_))));
    }

    #[tokio::test]
    async fn test_copy_tree_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = FsContentCopier::new()
            .copy_tree(&temp.path().join("ghost"), &temp.path().join("out"))
            .await;
        assert!(matches!(result, Err(CopyError::SourceNotFound(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_tree_follows_directory_symlink() {
        let temp = TempDir::new().unwrap();
        let shared = temp.path().join("shared");
        let from = temp.path().join("current");
        let to = temp.path().join("clone");
        sample_tree(&from).await;
        fs::create_dir_all(shared.join("img")).await.unwrap();
        fs::write(shared.join("img/logo.svg"), b"<svg/>").await.unwrap();
        fs::write(shared.join("robots.txt"), b"ok").await.unwrap();
        fs::symlink("../shared", from.join("assets")).await.unwrap();
        fs::symlink("../shared/robots.txt", from.join("robots.txt"))
            .await
            .unwrap();

        let stats = FsContentCopier::new().copy_tree(&from, &to).await.unwrap();

        assert_eq!(stats.directories, 5);
        assert_eq!(stats.files, 6);
        let assets = fs::symlink_metadata(to.join("assets")).await.unwrap();
        assert!(assets.is_dir());
        assert_eq!(
            fs::read(to.join("assets/img/logo.svg")).await.unwrap(),
            b"<svg/>".to_vec()
        );
        assert_eq!(fs::read(to.join("robots.txt")).await.unwrap(), b"ok".to_vec());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_copy_tree_rejects_symlink_loop() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("current");
        sample_tree(&from).await;
        fs::symlink("..", from.join("css/up")).await.unwrap();

        let result = FsContentCopier::new()
            .copy_tree(&from, &temp.path().join("clone"))
            .await;
        assert!(matches!(result, Err(CopyError::Io(_))));
    }

    #[tokio::test]
    async fn test_remove_tree_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("shop");
        sample_tree(&root).await;

        let copier = FsContentCopier::new();
        copier.remove_tree(&root).await.unwrap();
        assert!(!root.exists());
        copier.remove_tree(&root).await.unwrap();
    }
}
