use std::{
    collections::HashMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, OnceLock},
};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    domain::{Category, RecurrenceRule, Settings, TransactionInstance},
    errors::{CalendarError, Result},
    utils::{ensure_dir, PathResolver},
};

use super::{
    ensure_owned,
    owner_data::{OwnerData, OWNER_SCHEMA_VERSION},
    CalendarStore, PersistOutcome,
};

const OWNER_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// One lock per owner file, shared by every `JsonStore` in the process.
static OWNER_LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

/// File-backed store writing one JSON document per owner.
///
/// Read-modify-write cycles on an owner file hold that file's lock, so handles
/// opened on the same directory within one process never interleave. Separate
/// processes are not coordinated.
pub struct JsonStore {
    owners_dir: PathBuf,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let owners_dir = PathResolver::owners_dir_in(&app_root);
        ensure_dir(&owners_dir)?;
        let owners_dir = fs::canonicalize(&owners_dir)?;
        Ok(Self { owners_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn owner_path(&self, owner: &str) -> PathBuf {
        self.owners_dir
            .join(format!("{}.{}", canonical_owner(owner), OWNER_EXTENSION))
    }

    fn locked<T>(&self, owner: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let path = self.owner_path(owner);
        let lock = owner_lock(&path)?;
        let _guard = lock.lock().map_err(|_| {
            CalendarError::Storage(format!("lock for `{}` poisoned", path.display()))
        })?;
        f()
    }

    fn read_owner(&self, owner: &str) -> Result<OwnerData> {
        let path = self.owner_path(owner);
        if !path.exists() {
            return Ok(OwnerData::new(owner));
        }
        let data = fs::read_to_string(&path)?;
        let record: OwnerData = serde_json::from_str(&data)?;
        if record.schema_version > OWNER_SCHEMA_VERSION {
            return Err(CalendarError::Storage(format!(
                "`{}` was written by a newer schema version",
                path.display()
            )));
        }
        if record.owner != owner {
            return Err(CalendarError::Storage(format!(
                "`{}` belongs to owner `{}`",
                path.display(),
                record.owner
            )));
        }
        Ok(record)
    }

    fn view<T>(&self, owner: &str, f: impl FnOnce(&OwnerData) -> T) -> Result<T> {
        self.locked(owner, || {
            let record = self.read_owner(owner)?;
            Ok(f(&record))
        })
    }

    fn modify<T>(&self, owner: &str, f: impl FnOnce(&mut OwnerData) -> Result<T>) -> Result<T> {
        self.locked(owner, || {
            let mut record = self.read_owner(owner)?;
            let outcome = f(&mut record)?;
            let json = serde_json::to_string_pretty(&record)?;
            write_atomic(&self.owner_path(owner), &json)?;
            Ok(outcome)
        })
    }
}

impl CalendarStore for JsonStore {
    fn load_rules(&self, owner: &str) -> Result<Vec<RecurrenceRule>> {
        self.view(owner, |data| data.rules.clone())
    }

    fn last_generated_date(&self, owner: &str, rule_id: Uuid) -> Result<Option<NaiveDate>> {
        self.view(owner, |data| data.last_generated_date(rule_id))
    }

    fn persist_instance(&self, owner: &str, instance: &TransactionInstance) -> Result<()> {
        ensure_owned(owner, &instance.owner)?;
        self.modify(owner, |data| data.insert_instance(instance.clone()))
    }

    fn load_settings(&self, owner: &str) -> Result<Option<Settings>> {
        self.view(owner, |data| data.settings)
    }

    fn persist_projected(
        &self,
        owner: &str,
        instances: &[TransactionInstance],
    ) -> Result<PersistOutcome> {
        if instances.is_empty() {
            return Ok(PersistOutcome::default());
        }
        for instance in instances {
            ensure_owned(owner, &instance.owner)?;
        }
        self.modify(owner, |data| {
            let mut outcome = PersistOutcome::default();
            for instance in instances {
                outcome.record(data.insert_instance(instance.clone()))?;
            }
            Ok(outcome)
        })
    }

    fn load_instances_from(
        &self,
        owner: &str,
        from: NaiveDate,
    ) -> Result<Vec<TransactionInstance>> {
        self.view(owner, |data| data.instances_from(from))
    }

    fn save_settings(&self, owner: &str, settings: &Settings) -> Result<()> {
        self.modify(owner, |data| {
            data.settings = Some(*settings);
            Ok(())
        })
    }

    fn insert_rule(&self, owner: &str, rule: &RecurrenceRule) -> Result<()> {
        ensure_owned(owner, &rule.owner)?;
        self.modify(owner, |data| data.insert_rule(rule.clone()))
    }

    fn delete_rule(&self, owner: &str, rule_id: Uuid) -> Result<bool> {
        self.modify(owner, |data| Ok(data.remove_rule(rule_id)))
    }

    fn delete_unconfirmed_for_rule(&self, owner: &str, rule_id: Uuid) -> Result<usize> {
        self.modify(owner, |data| Ok(data.remove_unconfirmed_for_rule(rule_id)))
    }

    fn load_instance(&self, owner: &str, id: Uuid) -> Result<Option<TransactionInstance>> {
        self.view(owner, |data| {
            data.instances.iter().find(|i| i.id == id).cloned()
        })
    }

    fn update_instance(&self, owner: &str, instance: &TransactionInstance) -> Result<()> {
        ensure_owned(owner, &instance.owner)?;
        self.modify(owner, |data| data.update_instance(instance.clone()))
    }

    fn delete_instance(&self, owner: &str, id: Uuid) -> Result<bool> {
        self.modify(owner, |data| Ok(data.remove_instance(id)))
    }

    fn load_categories(&self, owner: &str) -> Result<Vec<Category>> {
        self.view(owner, |data| data.categories.clone())
    }

    fn save_category(&self, owner: &str, category: &Category) -> Result<()> {
        ensure_owned(owner, &category.owner)?;
        self.modify(owner, |data| {
            data.save_category(category.clone());
            Ok(())
        })
    }
}

fn owner_lock(path: &Path) -> Result<Arc<Mutex<()>>> {
    let mut locks = OWNER_LOCKS
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .map_err(|_| CalendarError::Storage("json store lock registry poisoned".into()))?;
    Ok(Arc::clone(locks.entry(path.to_path_buf()).or_default()))
}

fn canonical_owner(owner: &str) -> String {
    let sanitized: String = owner
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '@' | '.' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '.').is_empty() {
        "owner".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
