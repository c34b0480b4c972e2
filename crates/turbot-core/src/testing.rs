// ── In-memory workspace for tests ──
//
// Entities live in one table addressed by id or any aka. Mod
// installations converge after a configurable number of installed-version
// checks.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::{
    ControlSelector, EntityKind, EntityRef, FolderFields, PublishedVersion, RemoteControl,
    RemoteFolder, RemoteMod, RemoteResource,
};
use crate::poller::INSTALLED_VERSION_PROPERTY;
use crate::remote::TurbotApi;
use crate::version::resolve_latest_compatible;

#[derive(Debug, Clone, Default)]
struct Entity {
    entity: EntityRef,
    resource_type: String,
    data: Map<String, Value>,
    folder: Option<(String, FolderFields)>,
    installed: Option<Installation>,
}

#[derive(Debug, Clone)]
struct Installation {
    org: String,
    mod_name: String,
    parent: String,
    target: String,
    installed: Option<String>,
    checks_until_ready: u32,
}

#[derive(Default)]
struct State {
    next_id: u64,
    entities: Vec<Entity>,
    catalogue: HashMap<(String, String), Vec<PublishedVersion>>,
    controls: Vec<RemoteControl>,
    install_delay: u32,
    failures: HashMap<&'static str, String>,
    calls: Vec<&'static str>,
}

impl State {
    fn find(&self, key: &str) -> Option<usize> {
        self.entities.iter().position(|e| {
            e.entity.id == key
                || e.entity
                    .akas
                    .as_ref()
                    .is_some_and(|akas| akas.iter().any(|a| a == key))
        })
    }

    fn get(&self, kind: EntityKind, key: &str) -> Result<&Entity, CoreError> {
        self.find(key)
            .and_then(|i| self.entities.get(i))
            .ok_or_else(|| not_found(kind, key))
    }

    fn get_mut(&mut self, kind: EntityKind, key: &str) -> Result<&mut Entity, CoreError> {
        match self.find(key) {
            Some(i) => self.entities.get_mut(i).ok_or_else(|| not_found(kind, key)),
            None => Err(not_found(kind, key)),
        }
    }

    fn enter(&mut self, op: &'static str) -> Result<(), CoreError> {
        self.calls.push(op);
        match self.failures.remove(op) {
            Some(message) => Err(CoreError::Transport {
                message,
                code: None,
                status: Some(500),
            }),
            None => Ok(()),
        }
    }

    fn parent_id(&self, parent: &str) -> Result<String, CoreError> {
        self.find(parent)
            .and_then(|i| self.entities.get(i))
            .map(|e| e.entity.id.clone())
            .ok_or_else(|| CoreError::Transport {
                message: format!("invalid parent: {parent}"),
                code: Some("invalid_parent".into()),
                status: Some(400),
            })
    }

    fn insert(&mut self, parent_id: String) -> EntityRef {
        self.next_id += 1;
        let entity = EntityRef {
            id: (1000 + self.next_id).to_string(),
            parent_id,
            akas: None,
        };
        self.entities.push(Entity {
            entity: entity.clone(),
            ..Entity::default()
        });
        entity
    }
}

fn not_found(kind: EntityKind, key: &str) -> CoreError {
    CoreError::NotFound {
        kind,
        identifier: key.to_owned(),
    }
}

#[derive(Default)]
pub(crate) struct FakeWorkspace {
    state: Mutex<State>,
}

#[allow(clippy::unwrap_used)]
impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_resource_with_akas(&self, id: &str, parent_id: &str, akas: &[&str]) {
        let akas = if akas.is_empty() {
            None
        } else {
            Some(akas.iter().map(|a| (*a).to_string()).collect())
        };
        self.state().entities.push(Entity {
            entity: EntityRef {
                id: id.into(),
                parent_id: parent_id.into(),
                akas,
            },
            ..Entity::default()
        });
    }

    pub fn set_data(&self, id: &str, data: Value) {
        let mut state = self.state();
        let entity = state.get_mut(EntityKind::Resource, id).unwrap();
        entity.data = data.as_object().cloned().unwrap_or_default();
    }

    pub fn data(&self, id: &str) -> Map<String, Value> {
        self.state().get(EntityKind::Resource, id).unwrap().data.clone()
    }

    pub fn remove(&self, id: &str) {
        let mut state = self.state();
        if let Some(i) = state.find(id) {
            state.entities.remove(i);
        }
    }

    pub fn publish(&self, org: &str, mod_name: &str, versions: &[(&str, &str)]) {
        self.state().catalogue.insert(
            (org.into(), mod_name.into()),
            versions
                .iter()
                .map(|(v, s)| PublishedVersion {
                    version: (*v).to_string(),
                    status: (*s).to_string(),
                })
                .collect(),
        );
    }

    /// Installations report their target after this many checks.
    pub fn set_install_delay(&self, checks: u32) {
        self.state().install_delay = checks;
    }

    /// Pretend a mod is already installed at `version`.
    pub fn add_installed_mod(&self, id: &str, parent_id: &str, org: &str, mod_name: &str, version: &str) {
        self.state().entities.push(Entity {
            entity: EntityRef {
                id: id.into(),
                parent_id: parent_id.into(),
                akas: None,
            },
            installed: Some(Installation {
                org: org.into(),
                mod_name: mod_name.into(),
                parent: parent_id.into(),
                target: version.into(),
                installed: Some(version.into()),
                checks_until_ready: 0,
            }),
            ..Entity::default()
        });
    }

    pub fn add_control(&self, control: RemoteControl) {
        self.state().controls.push(control);
    }

    /// The next call to `op` fails with a 500.
    pub fn fail_next(&self, op: &'static str, message: &str) {
        self.state().failures.insert(op, message.into());
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state().calls.clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.state().calls.iter().filter(|c| **c == op).count()
    }
}

#[allow(clippy::unwrap_used)]
#[async_trait]
impl TurbotApi for FakeWorkspace {
    async fn create_resource(
        &self,
        resource_type: &str,
        parent: &str,
        data: &Map<String, Value>,
    ) -> Result<EntityRef, CoreError> {
        let mut state = self.state();
        state.enter("create_resource")?;
        let parent_id = state.parent_id(parent)?;
        let entity = state.insert(parent_id);
        let stored = state.get_mut(EntityKind::Resource, &entity.id)?;
        stored.resource_type = resource_type.into();
        stored.data = data.clone();
        Ok(entity)
    }

    async fn read_resource(
        &self,
        id: &str,
        properties: Option<&BTreeMap<String, String>>,
    ) -> Result<RemoteResource, CoreError> {
        let mut state = self.state();
        state.enter("read_resource")?;
        let entity = state.get_mut(EntityKind::Resource, id)?;

        let data = match properties {
            None => entity.data.clone(),
            Some(projection) => {
                let mut data = Map::new();
                for (alias, path) in projection {
                    let value = if path == INSTALLED_VERSION_PROPERTY {
                        match entity.installed.as_mut() {
                            Some(install) => {
                                if install.checks_until_ready > 0 {
                                    install.checks_until_ready -= 1;
                                }
                                if install.checks_until_ready == 0 {
                                    install.installed = Some(install.target.clone());
                                }
                                install.installed.clone().map_or(Value::Null, Value::from)
                            }
                            None => Value::Null,
                        }
                    } else {
                        entity.data.get(path).cloned().unwrap_or(Value::Null)
                    };
                    data.insert(alias.clone(), value);
                }
                data
            }
        };

        Ok(RemoteResource {
            entity: entity.entity.clone(),
            data,
        })
    }

    async fn update_resource(
        &self,
        id: &str,
        resource_type: &str,
        parent: &str,
        data: &Map<String, Value>,
    ) -> Result<EntityRef, CoreError> {
        let mut state = self.state();
        state.enter("update_resource")?;
        let parent_id = state.parent_id(parent)?;
        let stored = state.get_mut(EntityKind::Resource, id)?;
        stored.entity.parent_id = parent_id;
        stored.resource_type = resource_type.into();
        stored.data = data.clone();
        Ok(stored.entity.clone())
    }

    async fn delete_resource(&self, id: &str) -> Result<(), CoreError> {
        let mut state = self.state();
        state.enter("delete_resource")?;
        let index = state
            .find(id)
            .ok_or_else(|| not_found(EntityKind::Resource, id))?;
        state.entities.remove(index);
        Ok(())
    }

    async fn resource_exists(&self, id: &str) -> Result<bool, CoreError> {
        let mut state = self.state();
        state.enter("resource_exists")?;
        Ok(state.find(id).is_some())
    }

    async fn create_folder(
        &self,
        parent: &str,
        fields: &FolderFields,
    ) -> Result<EntityRef, CoreError> {
        let mut state = self.state();
        state.enter("create_folder")?;
        let parent_id = state.parent_id(parent)?;
        let entity = state.insert(parent_id.clone());
        let stored = state.get_mut(EntityKind::Folder, &entity.id)?;
        stored.folder = Some((parent_id, fields.clone()));
        Ok(entity)
    }

    async fn read_folder(&self, id: &str) -> Result<RemoteFolder, CoreError> {
        let mut state = self.state();
        state.enter("read_folder")?;
        let entity = state.get(EntityKind::Folder, id)?;
        let (parent, fields) = entity
            .folder
            .clone()
            .ok_or_else(|| not_found(EntityKind::Folder, id))?;
        Ok(RemoteFolder {
            entity: entity.entity.clone(),
            parent,
            fields,
        })
    }

    async fn update_folder(
        &self,
        id: &str,
        parent: &str,
        fields: &FolderFields,
    ) -> Result<EntityRef, CoreError> {
        let mut state = self.state();
        state.enter("update_folder")?;
        let parent_id = state.parent_id(parent)?;
        let stored = state.get_mut(EntityKind::Folder, id)?;
        stored.entity.parent_id.clone_from(&parent_id);
        stored.folder = Some((parent_id, fields.clone()));
        Ok(stored.entity.clone())
    }

    async fn install_mod(
        &self,
        parent: &str,
        org: &str,
        mod_name: &str,
        version: &str,
    ) -> Result<EntityRef, CoreError> {
        let mut state = self.state();
        state.enter("install_mod")?;
        let parent_id = state.parent_id(parent)?;
        let catalogue = state
            .catalogue
            .get(&(org.to_owned(), mod_name.to_owned()))
            .cloned()
            .unwrap_or_default();
        let target = resolve_latest_compatible(version, &catalogue)?
            .map(|r| r.to_string())
            .unwrap_or_default();
        let delay = state.install_delay;

        // Reinstalling at the same parent updates the existing mod.
        let existing = state.entities.iter().position(|e| {
            e.installed
                .as_ref()
                .is_some_and(|i| i.parent == parent_id && i.org == org && i.mod_name == mod_name)
        });
        let id = match existing {
            Some(i) => state.entities.get(i).unwrap().entity.id.clone(),
            None => state.insert(parent_id.clone()).id,
        };
        let stored = state.get_mut(EntityKind::Mod, &id)?;
        let previous = stored.installed.as_ref().and_then(|i| i.installed.clone());
        stored.installed = Some(Installation {
            org: org.into(),
            mod_name: mod_name.into(),
            parent: parent_id,
            target,
            installed: previous,
            checks_until_ready: delay,
        });
        Ok(stored.entity.clone())
    }

    async fn read_mod(&self, id: &str) -> Result<RemoteMod, CoreError> {
        let mut state = self.state();
        state.enter("read_mod")?;
        let entity = state.get(EntityKind::Mod, id)?;
        let install = entity
            .installed
            .as_ref()
            .ok_or_else(|| not_found(EntityKind::Mod, id))?;
        Ok(RemoteMod {
            entity: entity.entity.clone(),
            parent: install.parent.clone(),
            org: install.org.clone(),
            mod_name: install.mod_name.clone(),
            installed_version: install.installed.clone(),
        })
    }

    async fn uninstall_mod(&self, id: &str) -> Result<(), CoreError> {
        let mut state = self.state();
        state.enter("uninstall_mod")?;
        let index = state.find(id).ok_or_else(|| not_found(EntityKind::Mod, id))?;
        state.entities.remove(index);
        Ok(())
    }

    async fn list_mod_versions(
        &self,
        org: &str,
        mod_name: &str,
    ) -> Result<Vec<PublishedVersion>, CoreError> {
        let mut state = self.state();
        state.enter("list_mod_versions")?;
        state
            .catalogue
            .get(&(org.to_owned(), mod_name.to_owned()))
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Mod, &format!("{org}/{mod_name}")))
    }

    async fn read_control(&self, selector: &ControlSelector) -> Result<RemoteControl, CoreError> {
        let mut state = self.state();
        state.enter("read_control")?;
        state
            .controls
            .iter()
            .find(|c| match selector {
                ControlSelector::Id(id) => &c.id == id,
                ControlSelector::UriAndResource { uri, resource } => {
                    &c.type_uri == uri && &c.resource_id == resource
                }
            })
            .cloned()
            .ok_or_else(|| not_found(EntityKind::Control, &selector.to_string()))
    }
}
