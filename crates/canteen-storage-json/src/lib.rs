use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use canteen_core::{
    storage::{ProductStore, SaleStore},
    CoreError,
};
use canteen_domain::{Product, SaleRecord};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

const SALES_FILE: &str = "sales.json";
const PRODUCTS_FILE: &str = "products.json";
const BACKUPS_DIR: &str = "backups";
const BACKUP_PREFIX: &str = "sales";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed JSON persistence for sales and the product catalog.
///
/// Layout under `root`:
/// `sales.json` (top-level array), `products.json`, `backups/sales_<timestamp>.json`.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStore {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(root, DEFAULT_RETENTION)
    }

    pub fn with_retention(root: PathBuf, retention: usize) -> Result<Self, CoreError> {
        let backups_dir = root.join(BACKUPS_DIR);
        fs::create_dir_all(&root)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            root,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sales_path(&self) -> PathBuf {
        self.root.join(SALES_FILE)
    }

    pub fn products_path(&self) -> PathBuf {
        self.root.join(PRODUCTS_FILE)
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Backups of the sales file, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(created_at) = parse_backup_timestamp(file_name) else {
                continue;
            };
            let size_bytes = entry.metadata().map(|meta| meta.len()).unwrap_or(0);
            entries.push(BackupInfo {
                name: file_name.to_string(),
                created_at,
                size_bytes,
                path: path.clone(),
            });
        }
        entries.sort_by_key(|info| Reverse(info.created_at));
        Ok(entries)
    }

    /// Replaces the sales file with the named backup.
    ///
    /// The backup is parsed before anything is written, and the current file is
    /// itself backed up first.
    pub fn restore_backup(&self, name: &str) -> Result<Vec<SaleRecord>, CoreError> {
        let backup = self
            .list_backups()?
            .into_iter()
            .find(|info| info.name == name)
            .ok_or_else(|| CoreError::Storage(format!("backup `{name}` not found")))?;
        let records: Vec<SaleRecord> = read_json(&backup.path)?.unwrap_or_default();
        self.save_sales(&records)?;
        debug!(backup = %backup.name, count = records.len(), "restored sales backup");
        Ok(records)
    }

    fn backup_existing_sales(&self) -> Result<(), CoreError> {
        let path = self.sales_path();
        if !path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let file_name = format!("{BACKUP_PREFIX}_{timestamp}.{BACKUP_EXTENSION}");
        let backup_path = self.backups_dir.join(&file_name);
        fs::copy(&path, &backup_path)?;
        debug!(backup = %file_name, "backed up sales file");
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            remove_backup(&entry);
        }
        Ok(())
    }
}

impl SaleStore for JsonStore {
    fn load_sales(&self) -> Result<Vec<SaleRecord>, CoreError> {
        let records: Vec<SaleRecord> = read_json(&self.sales_path())?.unwrap_or_default();
        debug!(count = records.len(), "read sales file");
        Ok(records)
    }

    fn save_sales(&self, records: &[SaleRecord]) -> Result<(), CoreError> {
        self.backup_existing_sales()?;
        write_json(&self.sales_path(), records)?;
        debug!(count = records.len(), "wrote sales file");
        Ok(())
    }
}

impl ProductStore for JsonStore {
    fn load_products(&self) -> Result<Vec<Product>, CoreError> {
        Ok(read_json(&self.products_path())?.unwrap_or_default())
    }

    fn save_products(&self, products: &[Product]) -> Result<(), CoreError> {
        write_json(&self.products_path(), products)?;
        debug!(count = products.len(), "wrote products file");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Reads a JSON document. A missing file yields `None`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|err| CoreError::Serde(format!("{}: {err}", path.display())))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CoreError> {
    let data =
        serde_json::to_string_pretty(value).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_file(&tmp, &data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name
        .strip_prefix(BACKUP_PREFIX)?
        .strip_prefix('_')?
        .strip_suffix(&format!(".{BACKUP_EXTENSION}"))?;
    NaiveDateTime::parse_from_str(stem, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// A failed removal is logged and leaves the file for the next prune.
fn remove_backup(entry: &BackupInfo) -> bool {
    match fs::remove_file(&entry.path) {
        Ok(()) => {
            debug!(backup = %entry.name, "pruned old backup");
            true
        }
        Err(err) => {
            warn!(backup = %entry.name, error = %err, "failed to prune old backup");
            false
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
