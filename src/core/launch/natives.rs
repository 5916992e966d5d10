// ─── Native Extraction ───
// Unpacks platform native archives into the per-launch staging directory.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use sha1::{Digest, Sha1};
use tracing::{debug, error, info, warn};

use crate::core::error::{LaunchWarning, LauncherError, LauncherResult};

use super::libraries::NativeLibrary;

/// Largest native entry accepted. Real natives are a few megabytes.
const MAX_NATIVE_ENTRY_SIZE: u64 = 256 * 1024 * 1024;

/// What happened during extraction. Per-entry failures never abort the run.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub written: usize,
    pub excluded: usize,
    pub warnings: Vec<LaunchWarning>,
}

struct UnpackedEntry {
    name: String,
    relative: PathBuf,
    data: Vec<u8>,
}

#[derive(Default)]
struct UnpackedArchive {
    dirs: Vec<PathBuf>,
    files: Vec<UnpackedEntry>,
    excluded: usize,
    warnings: Vec<LaunchWarning>,
}

/// Extract every native archive into `natives_dir`, creating it if absent.
///
/// Only failure to create the staging directory is fatal. Unreadable or
/// corrupt archives and individual entries are logged, reported and skipped.
pub async fn extract_natives(
    natives: &[NativeLibrary],
    natives_dir: &Path,
) -> LauncherResult<ExtractionReport> {
    tokio::fs::create_dir_all(natives_dir)
        .await
        .map_err(|e| LauncherError::Io {
            path: natives_dir.to_path_buf(),
            source: e,
        })?;

    let mut report = ExtractionReport::default();

    for lib in natives {
        let bytes = match tokio::fs::read(&lib.archive).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot read native archive {:?}: {}", lib.archive, e);
                report.warnings.push(LaunchWarning::NativeArchive {
                    path: lib.archive.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Some(expected) = lib.sha1.as_deref() {
            let actual = sha1_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                warn!("Checksum mismatch for {:?}, skipping", lib.archive);
                report.warnings.push(LaunchWarning::ChecksumMismatch {
                    path: lib.archive.clone(),
                    expected: expected.to_string(),
                    actual,
                });
                continue;
            }
        }

        let exclusions = lib.exclusions.clone();
        let unpacked = tokio::task::spawn_blocking(move || unpack_archive(bytes, &exclusions)).await;

        let outcome = match unpacked {
            Ok(Ok(unpacked)) => Ok(unpacked),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(format!("unpack task failed: {}", e)),
        };
        let unpacked = match outcome {
            Ok(unpacked) => unpacked,
            Err(reason) => {
                warn!("Cannot open native archive {:?}: {}", lib.archive, reason);
                report.warnings.push(LaunchWarning::NativeArchive {
                    path: lib.archive.clone(),
                    reason,
                });
                continue;
            }
        };

        report.excluded += unpacked.excluded;
        report.warnings.extend(unpacked.warnings);

        for dir in &unpacked.dirs {
            let target = natives_dir.join(dir);
            if let Err(e) = tokio::fs::create_dir_all(&target).await {
                error!("Error while creating native directory {:?}: {}", target, e);
                report.warnings.push(LaunchWarning::NativeEntry {
                    entry: dir.to_string_lossy().to_string(),
                    reason: e.to_string(),
                });
            }
        }

        // Entries are independent of each other, write them concurrently.
        let writes = unpacked.files.into_iter().map(|entry| {
            let target = natives_dir.join(&entry.relative);
            async move {
                let result = write_entry(&target, &entry.data).await;
                (entry.name, result)
            }
        });

        for (name, result) in join_all(writes).await {
            match result {
                Ok(()) => {
                    debug!("Extracted native: {}", name);
                    report.written += 1;
                }
                Err(e) => {
                    error!("Error while extracting native library entry {}: {}", name, e);
                    report.warnings.push(LaunchWarning::NativeEntry {
                        entry: name,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    info!(
        "Extracted {} native files into {:?} ({} excluded, {} problems)",
        report.written,
        natives_dir,
        report.excluded,
        report.warnings.len()
    );
    Ok(report)
}

/// Remove a staging directory once the game process has exited.
pub async fn cleanup_natives(natives_dir: &Path) {
    if natives_dir.exists() {
        match tokio::fs::remove_dir_all(natives_dir).await {
            Ok(()) => debug!("Removed native staging directory {:?}", natives_dir),
            Err(e) => warn!("Error while deleting temp dir {:?}: {}", natives_dir, e),
        }
    }
}

fn unpack_archive(bytes: Vec<u8>, exclusions: &[String]) -> LauncherResult<UnpackedArchive> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut out = UnpackedArchive::default();

    for i in 0..archive.len() {
        let mut file = match archive.by_index(i) {
            Ok(file) => file,
            Err(e) => {
                out.warnings.push(LaunchWarning::NativeEntry {
                    entry: format!("#{}", i),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let name = file.name().to_string();

        if exclusions.iter().any(|ex| name.contains(ex.as_str())) {
            out.excluded += 1;
            continue;
        }

        let Some(relative) = file.enclosed_name() else {
            out.warnings.push(LaunchWarning::NativeEntry {
                entry: name,
                reason: "path escapes the staging directory".into(),
            });
            continue;
        };

        if file.is_dir() {
            out.dirs.push(relative);
            continue;
        }

        // The declared size comes from the archive and cannot be trusted.
        if file.size() > MAX_NATIVE_ENTRY_SIZE {
            out.warnings.push(LaunchWarning::NativeEntry {
                entry: name,
                reason: format!("declared size {} exceeds the limit", file.size()),
            });
            continue;
        }

        let mut data = Vec::new();
        if let Err(e) = (&mut file)
            .take(MAX_NATIVE_ENTRY_SIZE + 1)
            .read_to_end(&mut data)
        {
            out.warnings.push(LaunchWarning::NativeEntry {
                entry: name,
                reason: e.to_string(),
            });
            continue;
        }
        if data.len() as u64 > MAX_NATIVE_ENTRY_SIZE {
            out.warnings.push(LaunchWarning::NativeEntry {
                entry: name,
                reason: "entry exceeds the size limit".into(),
            });
            continue;
        }

        out.files.push(UnpackedEntry {
            name,
            relative,
            data,
        });
    }

    Ok(out)
}

async fn write_entry(target: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, data).await
}

fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("natives-test-{}-{}", label, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    fn native(archive: PathBuf, exclusions: &[&str]) -> NativeLibrary {
        NativeLibrary {
            name: "org.lwjgl.lwjgl:lwjgl-platform:2.9.4".into(),
            archive,
            sha1: None,
            exclusions: exclusions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn default_exclusion_skips_metadata_entries() {
        let temp = temp_dir("exclude");
        let archive = temp.join("natives.jar");
        write_zip(
            &archive,
            &[
                ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0"),
                ("liblwjgl64.so", "elf"),
            ],
        );
        let dest = temp.join("staging");

        let report = extract_natives(&[native(archive, &["META-INF/"])], &dest)
            .await
            .unwrap();

        assert_eq!(report.written, 1);
        assert_eq!(report.excluded, 1);
        assert!(report.warnings.is_empty());
        assert_eq!(std::fs::read(dest.join("liblwjgl64.so")).unwrap(), b"elf");
        assert!(!dest.join("META-INF").exists());

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[tokio::test]
    async fn nested_entries_and_directories_are_created() {
        let temp = temp_dir("nested");
        let archive = temp.join("natives.jar");
        write_zip(
            &archive,
            &[("linux/", ""), ("linux/x64/libglfw.so", "glfw")],
        );
        let dest = temp.join("staging");

        let report = extract_natives(&[native(archive, &[])], &dest).await.unwrap();

        assert_eq!(report.written, 1);
        assert!(dest.join("linux").is_dir());
        assert_eq!(std::fs::read(dest.join("linux/x64/libglfw.so")).unwrap(), b"glfw");

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[tokio::test]
    async fn broken_archives_do_not_abort_remaining_libraries() {
        let temp = temp_dir("broken");
        let corrupt = temp.join("corrupt.jar");
        std::fs::write(&corrupt, b"definitely not a zip").unwrap();
        let missing = temp.join("missing.jar");
        let good = temp.join("good.jar");
        write_zip(&good, &[("OpenAL64.dll", "dll")]);
        let dest = temp.join("staging");

        let report = extract_natives(
            &[
                native(corrupt, &[]),
                native(missing, &[]),
                native(good, &[]),
            ],
            &dest,
        )
        .await
        .unwrap();

        assert_eq!(report.written, 1);
        assert_eq!(report.warnings.len(), 2);
        assert!(report
            .warnings
            .iter()
            .all(|w| matches!(w, LaunchWarning::NativeArchive { .. })));
        assert!(dest.join("OpenAL64.dll").exists());

        let _ = std::fs::remove_dir_all(&temp);
    }

    fn le_u16(bytes: &[u8], at: usize) -> usize {
        u16::from_le_bytes([bytes[at], bytes[at + 1]]) as usize
    }

    /// Rewrite the uncompressed size recorded in the central directory for
    /// `target`, through the zip64 extra field when the entry has one.
    fn patch_declared_size(bytes: &mut [u8], target: &str, size: u64) {
        let mut pos = 0;
        while pos + 46 <= bytes.len() {
            if bytes[pos..pos + 4] != [0x50, 0x4b, 0x01, 0x02] {
                pos += 1;
                continue;
            }
            let name_len = le_u16(bytes, pos + 28);
            let extra_len = le_u16(bytes, pos + 30);
            let name_start = pos + 46;
            if &bytes[name_start..name_start + name_len] != target.as_bytes() {
                pos = name_start;
                continue;
            }

            if bytes[pos + 24..pos + 28] == [0xff; 4] {
                let mut extra = name_start + name_len;
                let extra_end = extra + extra_len;
                while extra + 4 <= extra_end {
                    let id = le_u16(bytes, extra);
                    let len = le_u16(bytes, extra + 2);
                    if id == 0x0001 {
                        bytes[extra + 4..extra + 12].copy_from_slice(&size.to_le_bytes());
                        return;
                    }
                    extra += 4 + len;
                }
            }
            let clamped = size.min(u32::MAX as u64 - 1) as u32;
            bytes[pos + 24..pos + 28].copy_from_slice(&clamped.to_le_bytes());
            return;
        }
        panic!("central directory entry {} not found", target);
    }

    #[tokio::test]
    async fn oversized_entry_is_reported_and_siblings_still_extracted() {
        let temp = temp_dir("oversized");
        let archive = temp.join("natives.jar");
        {
            let file = std::fs::File::create(&archive).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            let stored = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            zip.start_file("huge.so", stored.large_file(true)).unwrap();
            zip.write_all(b"tiny").unwrap();
            zip.start_file("liblwjgl.so", stored).unwrap();
            zip.write_all(b"elf").unwrap();
            zip.finish().unwrap();
        }
        let mut bytes = std::fs::read(&archive).unwrap();
        patch_declared_size(&mut bytes, "huge.so", 1 << 62);
        std::fs::write(&archive, &bytes).unwrap();
        let dest = temp.join("staging");

        let report = extract_natives(&[native(archive, &[])], &dest).await.unwrap();

        assert_eq!(report.written, 1);
        assert!(report
            .warnings
            .iter()
            .any(|w| matches!(w, LaunchWarning::NativeEntry { .. })));
        assert!(!dest.join("huge.so").exists());
        assert_eq!(std::fs::read(dest.join("liblwjgl.so")).unwrap(), b"elf");

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[tokio::test]
    async fn checksum_mismatch_skips_archive() {
        let temp = temp_dir("checksum");
        let archive = temp.join("natives.jar");
        write_zip(&archive, &[("jinput.dll", "dll")]);
        let expected = sha1_hex(&std::fs::read(&archive).unwrap());
        let dest = temp.join("staging");

        let mut bad = native(archive.clone(), &[]);
        bad.sha1 = Some("0000000000000000000000000000000000000000".into());
        let report = extract_natives(&[bad], &dest).await.unwrap();
        assert_eq!(report.written, 0);
        assert!(matches!(
            report.warnings.as_slice(),
            [LaunchWarning::ChecksumMismatch { .. }]
        ));

        let mut ok = native(archive, &[]);
        ok.sha1 = Some(expected.to_uppercase());
        let report = extract_natives(&[ok], &dest).await.unwrap();
        assert_eq!(report.written, 1);

        let _ = std::fs::remove_dir_all(&temp);
    }

    #[tokio::test]
    async fn cleanup_removes_staging_directory() {
        let temp = temp_dir("cleanup");
        let dest = temp.join("staging");
        extract_natives(&[], &dest).await.unwrap();
        assert!(dest.is_dir());

        cleanup_natives(&dest).await;
        assert!(!dest.exists());

        let _ = std::fs::remove_dir_all(&temp);
    }
}
