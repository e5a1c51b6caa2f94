//! File Certificate Store - 基于目录的证书存储
//!
//! 证书按 `{base_dir}/{store_name}/{指纹}.cer` 保存为 DER
//!
//! 支持 PKCS#12 (.pfx/.p12)、PEM 和 DER，PKCS#12 取私钥链的叶证书

use async_trait::async_trait;
use p12_keystore::{KeyStore, KeyStoreEntry};
use sha1::{Digest, Sha1};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use x509_parser::pem::parse_x509_pem;
use x509_parser::parse_x509_certificate;

use crate::application::ports::{CertificateError, CertificateStorePort, ImportedCertificate};

/// 文件证书存储
pub struct FileCertificateStore {
    base_dir: PathBuf,
    store_name: String,
}

impl FileCertificateStore {
    pub fn new(base_dir: impl Into<PathBuf>, store_name: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            store_name: store_name.into(),
        }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.base_dir.join(&self.store_name)
    }
}

fn io_error(path: &Path, err: io::Error) -> CertificateError {
    let message = format!("{}: {}", path.display(), err);
    match err.kind() {
        io::ErrorKind::NotFound => CertificateError::FileNotFound(path.display().to_string()),
        io::ErrorKind::PermissionDenied => CertificateError::PermissionDenied(message),
        _ => CertificateError::Io(message),
    }
}

/// 取出证书的 DER 编码，PEM 需先解包
fn der_bytes(data: &[u8]) -> Result<Vec<u8>, CertificateError> {
    let text_start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());

    if data[text_start..].starts_with(b"-----BEGIN") {
        let (_, pem) = parse_x509_pem(data)
            .map_err(|e| CertificateError::InvalidCertificate(e.to_string()))?;
        if pem.label != "CERTIFICATE" {
            return Err(CertificateError::UnsupportedFormat(format!(
                "PEM block {}",
                pem.label
            )));
        }
        Ok(pem.contents)
    } else {
        Ok(data.to_vec())
    }
}

/// 用密码解开 PKCS#12 包，取出叶证书的 DER 编码
fn pkcs12_leaf(data: &[u8], password: &str) -> Result<Vec<u8>, CertificateError> {
    let keystore = KeyStore::from_pkcs12(data, password)
        .map_err(|e| CertificateError::InvalidCertificate(format!("PKCS#12: {}", e)))?;

    let mut trusted = None;
    for (_, entry) in keystore.entries() {
        if let KeyStoreEntry::PrivateKeyChain(chain) = entry {
            if let Some(leaf) = chain.chain().first() {
                return Ok(leaf.as_der().to_vec());
            }
        } else if let KeyStoreEntry::Certificate(certificate) = entry {
            trusted.get_or_insert_with(|| certificate.as_der().to_vec());
        }
    }

    trusted.ok_or_else(|| {
        CertificateError::InvalidCertificate("PKCS#12 bundle holds no certificate".to_string())
    })
}

fn is_pkcs12(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pfx") || ext.eq_ignore_ascii_case("p12"))
        .unwrap_or(false)
}

#[async_trait]
impl CertificateStorePort for FileCertificateStore {
    async fn import(
        &self,
        certificate_path: &Path,
        password: &str,
    ) -> Result<ImportedCertificate, CertificateError> {
        let data = fs::read(certificate_path)
            .await
            .map_err(|e| io_error(certificate_path, e))?;
        let der = if is_pkcs12(certificate_path) {
            pkcs12_leaf(&data, password)?
        } else {
            der_bytes(&data)?
        };

        let subject = {
            let (_, certificate) = parse_x509_certificate(&der)
                .map_err(|e| CertificateError::InvalidCertificate(e.to_string()))?;
            certificate.subject().to_string()
        };

        let hash = hex::encode_upper(Sha1::digest(&der));

        let store_dir = self.store_dir();
        fs::create_dir_all(&store_dir)
            .await
            .map_err(|e| io_error(&store_dir, e))?;
        let target = store_dir.join(format!("{}.cer", hash));
        fs::write(&target, &der)
            .await
            .map_err(|e| io_error(&target, e))?;

        tracing::debug!(
            path = %target.display(),
            hash = %hash,
            "Certificate written to store"
        );

        Ok(ImportedCertificate {
            hash,
            store_name: self.store_name.clone(),
            subject,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PEM: &[u8] = include_bytes!("testdata/siteadmin-test.pem");
    const DER: &[u8] = include_bytes!("testdata/siteadmin-test.der");
    const THUMBPRINT: &str = "1D0CDE8F2B50974160CBA54F674CB7A16B7EE7E7";
    const PFX: &[u8] = include_bytes!("testdata/siteadmin-test.pfx");
    const PFX_THUMBPRINT: &str = "7EB138E0D78157644416301A9C6AF174CACA513A";

    #[tokio::test]
    async fn test_import_pem() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("site.pem");
        fs::write(&source, PEM).await.unwrap();

        let store = FileCertificateStore::new(temp.path().join("certs"), "TrustedPeople");
        let imported = store.import(&source, "ignored").await.unwrap();

        assert_eq!(imported.hash, THUMBPRINT);
        assert_eq!(imported.store_name, "TrustedPeople");
        assert!(imported.subject.contains("siteadmin.test"));

        let stored = store.store_dir().join(format!("{}.cer", THUMBPRINT));
        assert_eq!(fs::read(stored).await.unwrap(), DER.to_vec());
    }

    #[tokio::test]
    async fn test_import_der_matches_pem_thumbprint() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("site.cer");
        fs::write(&source, DER).await.unwrap();

        let store = FileCertificateStore::new(temp.path(), "My");
        let imported = store.import(&source, "").await.unwrap();
        assert_eq!(imported.hash, THUMBPRINT);
    }

    #[tokio::test]
    async fn test_import_pfx_with_password() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("site.pfx");
        fs::write(&source, PFX).await.unwrap();

        let store = FileCertificateStore::new(temp.path().join("certs"), "TrustedPeople");
        let imported = store.import(&source, "secret").await.unwrap();

        assert_eq!(imported.hash, PFX_THUMBPRINT);
        assert!(imported.subject.contains("secure.siteadmin.test"));

        let stored = fs::read(store.store_dir().join(format!("{}.cer", PFX_THUMBPRINT)))
            .await
            .unwrap();
        assert!(parse_x509_certificate(&stored).is_ok());
    }

    #[tokio::test]
    async fn test_import_pfx_wrong_password() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("site.P12");
        fs::write(&source, PFX).await.unwrap();

        let store = FileCertificateStore::new(temp.path(), "My");
        assert!(matches!(
            store.import(&source, "wrong").await,
            Err(CertificateError::InvalidCertificate(_))
        ));
        assert!(!store.store_dir().exists());
    }

    #[tokio::test]
    async fn test_import_errors() {
        let temp = TempDir::new().unwrap();
        let store = FileCertificateStore::new(temp.path(), "My");

        let missing = store.import(&temp.path().join("none.cer"), "").await;
        assert!(matches!(missing, Err(CertificateError::FileNotFound(_))));

        let pfx = temp.path().join("site.pfx");
        fs::write(&pfx, b"binary").await.unwrap();
        assert!(matches!(
            store.import(&pfx, "secret").await,
            Err(CertificateError::InvalidCertificate(_))
        ));

        let garbage = temp.path().join("garbage.cer");
        fs::write(&garbage, b"not a certificate").await.unwrap();
        assert!(matches!(
            store.import(&garbage, "").await,
            Err(CertificateError::InvalidCertificate(_))
        ));
    }
}
