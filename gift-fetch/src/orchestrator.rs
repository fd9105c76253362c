//! Per-source fetch/decrypt/classify state machine
//!
//! Per source: check the filelist against the stored snapshot (exact text
//! comparison), download whatever is not on disk yet, then once the
//! oracle self-test passes, decrypt pending archives and route each
//! payload by [`classify`]. Every recoverable failure is logged and the
//! pipeline moves to the next unit of work; only a corrupt authoritative
//! filelist ends a source's cycle, and only top-level faults end the run.

use boss_client::HttpClient;
use boss_manifest::{Manifest, ManifestEntry};
use crypto_client::OracleClient;
use gift_formats::payload::CONTAINER_RECORD_LEN;
use gift_formats::{ContainerArchive, NameTables, PayloadKind, Regulation, classify, strip_envelope};
use tracing::warn;

use crate::decoder::GiftDecoder;
use crate::error::{Error, Result};
use crate::layout::{Layout, ensure_dir, write};
use crate::runlog::RunLog;
use crate::source::Source;

/// Sequences the whole pipeline. Owns the collaborators each stage needs;
/// processing is strictly sequential and nothing is retried within a run.
pub struct FetchOrchestrator {
    http: HttpClient,
    oracle: OracleClient,
    layout: Layout,
    names: NameTables,
    decoder: Box<dyn GiftDecoder>,
}

impl FetchOrchestrator {
    pub fn new(
        http: HttpClient,
        oracle: OracleClient,
        layout: Layout,
        names: NameTables,
        decoder: Box<dyn GiftDecoder>,
    ) -> Self {
        Self {
            http,
            oracle,
            layout,
            names,
            decoder,
        }
    }

    /// Run one full cycle over the given sources: fetch everything, then
    /// self-test the oracle, then decrypt and extract. A failed self-test
    /// skips the decrypt/extract phase but the fetch phase has already
    /// completed by then.
    pub async fn run(&self, sources: &[Source], log: &mut RunLog) -> Result<()> {
        for source in sources {
            if let Err(e) = self.update_source(source, log).await {
                log.mark_noteworthy();
                log.line(&format!("Failed to update {}: {e}", source.name))
                    .await?;
            }
        }

        log.line("Testing decryption oracle...").await?;
        match self.oracle.self_test().await {
            Ok(()) => {
                log.line("Oracle self-test succeeded.").await?;
            }
            Err(e) => {
                log.mark_noteworthy();
                log.line(&format!(
                    "Oracle self-test failed: {e}. Skipping decrypt/extract for this run."
                ))
                .await?;
                return Ok(());
            }
        }

        log.line("Decrypting and extracting gifts...").await?;
        for source in sources {
            self.extract_source(source, log).await?;
        }
        Ok(())
    }

    /// Fetch the filelist for one source and download new archives.
    ///
    /// The filelist is the authoritative manifest: if it fails to parse,
    /// the stored snapshot is left untouched and the source's whole update
    /// cycle fails for this run.
    async fn update_source(&self, source: &Source, log: &mut RunLog) -> Result<()> {
        log.line(&format!("Updating for {}...", source.name)).await?;

        let url = self.http.filelist_url(&source.id);
        let new_text = self.http.get_text(&url).await?;
        let old_text = self.layout.read_manifest_snapshot(source).await?;

        if old_text.as_deref() == Some(new_text.as_str()) {
            log.line(&format!("No updates for {}.", source.name)).await?;
            return Ok(());
        }

        let new_manifest = Manifest::parse(&new_text).map_err(|e| Error::CorruptManifest {
            source: source.name.clone(),
            inner: e,
        })?;
        // The old snapshot was written by us; if it no longer parses,
        // treat it as empty rather than failing the cycle.
        let old_manifest = match &old_text {
            Some(text) => Manifest::parse(text).unwrap_or_else(|e| {
                warn!("Stored snapshot for {} is corrupt: {e}", source.name);
                Manifest::default()
            }),
            None => Manifest::default(),
        };

        log.mark_noteworthy();
        self.layout.write_manifest_snapshot(source, &new_text).await?;

        log.line(&format!(
            "Downloading new BOSS archives for {}...",
            source.name
        ))
        .await?;

        for entry in Manifest::diff(&old_manifest, &new_manifest) {
            let path = self.layout.encrypted_path(source, entry);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }

            let url = self.http.file_url(&source.id, &entry.name);
            let archive = match self.http.get(&url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    log.line(&format!("Failed to download {url}: {e}")).await?;
                    continue;
                }
            };

            write(&path, &archive).await?;
            log.line(&format!("Downloaded {}.", entry.file_name())).await?;

            if old_manifest
                .entries()
                .iter()
                .any(|old| entry.is_updated_version_of(old))
            {
                log.line(&format!(
                    "{} is an updated version of an old archive!",
                    entry.file_name()
                ))
                .await?;
            }
        }

        Ok(())
    }

    /// Decrypt pending archives for one source and route each payload.
    async fn extract_source(&self, source: &Source, log: &mut RunLog) -> Result<()> {
        log.line(&format!("Extracting archives for {}...", source.name))
            .await?;

        let enc_dir = self.layout.encrypted_dir(source);
        ensure_dir(&enc_dir).await?;

        let mut names = Vec::new();
        let mut dir = tokio::fs::read_dir(&enc_dir).await?;
        while let Some(item) = dir.next_entry().await? {
            let name = item.file_name().to_string_lossy().into_owned();
            if name.contains("-_-") {
                names.push(name);
            }
        }
        names.sort_unstable();

        for name in names {
            let entry = match ManifestEntry::from_archive_id(&name) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping stray file in archive store: {e}");
                    continue;
                }
            };

            let dec_path = self.layout.decrypted_path(source, &entry);
            if tokio::fs::try_exists(&dec_path).await.unwrap_or(false) {
                continue;
            }

            log.line(&format!("Decrypting {}...", entry.file_name())).await?;
            let encrypted = tokio::fs::read(enc_dir.join(&name)).await?;
            let decrypted = match self.oracle.decrypt_archive(&encrypted).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    log.mark_noteworthy();
                    log.line(&format!("Failed to decrypt {}: {e}", entry.file_name()))
                        .await?;
                    continue;
                }
            };
            log.line(&format!("Decrypted {}.", entry.file_name())).await?;
            log.mark_noteworthy();
            write(&dec_path, &decrypted).await?;

            let Some(content) = strip_envelope(&decrypted) else {
                log.line(&format!(
                    "{} is too short to carry a payload envelope ({} bytes).",
                    entry.file_name(),
                    decrypted.len()
                ))
                .await?;
                continue;
            };

            match classify(content.len(), &entry.name, source.generation) {
                PayloadKind::Gift => {
                    self.handle_gift(source, &entry, content, log).await?;
                }
                PayloadKind::CupContainer => {
                    log.line(&format!("{} is a CUP!", entry.file_name())).await?;
                    let dir = self.layout.cup_dir(source);
                    self.save_regulations(&dir, &entry, content, log).await?;
                }
                PayloadKind::RegulationContainer => {
                    log.line(&format!("{} is a regulation!", entry.file_name()))
                        .await?;
                    let dir = self.layout.regulation_dir(source);
                    self.save_regulations(&dir, &entry, content, log).await?;
                }
                PayloadKind::Unrecognized => {
                    log.line(&format!(
                        "{} is not a recognized payload ({:#x} content bytes).",
                        entry.file_name(),
                        content.len()
                    ))
                    .await?;
                }
            }
        }

        Ok(())
    }

    /// Store a gift payload and hand it to the external decoder.
    async fn handle_gift(
        &self,
        source: &Source,
        entry: &ManifestEntry,
        content: &[u8],
        log: &mut RunLog,
    ) -> Result<()> {
        write(&self.layout.gift_full_path(source, entry), content).await?;

        match self.decoder.decode(content, source.generation) {
            Ok(desc) => {
                write(&self.layout.gift_path(source, entry), &desc.card).await?;
                log.line(&format!(
                    "{} is a wondercard ({}):",
                    entry.file_name(),
                    desc.kind
                ))
                .await?;
                log.line(&desc.summary).await?;
            }
            Err(e) => {
                log.line(&format!("{} could not be decoded: {e}", entry.file_name()))
                    .await?;
            }
        }
        Ok(())
    }

    /// Parse a regulation container and save each record in binary and
    /// rendered-text form.
    async fn save_regulations(
        &self,
        dir: &std::path::Path,
        entry: &ManifestEntry,
        content: &[u8],
        log: &mut RunLog,
    ) -> Result<()> {
        log.line(&format!("Extracting/Saving {}...", entry.file_name()))
            .await?;

        let container = match ContainerArchive::parse(content, CONTAINER_RECORD_LEN) {
            Ok(container) => container,
            Err(e) => {
                log.line(&format!(
                    "Failed to parse container in {}: {e}",
                    entry.file_name()
                ))
                .await?;
                return Ok(());
            }
        };
        if container.skipped() > 0 {
            log.line(&format!(
                "Skipped {} invalid record(s) in {}.",
                container.skipped(),
                entry.file_name()
            ))
            .await?;
        }

        let total = container.records().len();
        for (i, bytes) in container.records().iter().enumerate() {
            let regulation = match Regulation::decode(bytes) {
                Ok(regulation) => regulation,
                Err(e) => {
                    log.line(&format!(
                        "Skipping regulation {}/{total} in {}: {e}",
                        i + 1,
                        entry.file_name()
                    ))
                    .await?;
                    continue;
                }
            };

            let stem = format!("{}_{}", entry.file_name(), i + 1);
            write(&dir.join("bin").join(format!("{stem}.bin")), regulation.data()).await?;

            let summary = regulation.render(&self.names);
            write(&dir.join("txt").join(format!("{stem}.txt")), summary.as_bytes()).await?;

            log.line(&format!("Regulation {}/{total}:", i + 1)).await?;
            log.line(&summary).await?;
        }

        Ok(())
    }
}
