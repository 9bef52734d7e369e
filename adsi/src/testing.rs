//! In-memory directory used by the unit tests in place of COM.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use windows::Win32::Foundation::E_NOINTERFACE;
use windows::core::HRESULT;

use crate::backend::{
    NativeCollection, NativeContainer, NativeCursor, NativeDirectory, NativeGroup, NativeMembers,
    NativeObject,
};
use crate::credentials::Credentials;
use crate::error::{AdsiError, AdsiResult};

pub use crate::error::codes::{
    ALREADY_EXISTS, LOGON_FAILURE, NO_SUCH_OBJECT, PROPERTY_NOT_FOUND, SERVER_DOWN,
};

const CONTAINER_CLASSES: &[&str] = &["container", "organizationalUnit", "domainDNS", "builtinDomain"];

/// Counts native calls and releases of a [`Tracked`] value.
#[derive(Clone, Default)]
pub struct Probe(Arc<ProbeState>);

#[derive(Default)]
struct ProbeState {
    calls: AtomicUsize,
    releases: AtomicUsize,
    late_calls: AtomicUsize,
}

impl Probe {
    pub fn native(&self) -> Tracked {
        Tracked { probe: self.clone() }
    }

    pub fn calls(&self) -> usize {
        self.0.calls.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.0.releases.load(Ordering::SeqCst)
    }

    pub fn calls_after_release(&self) -> usize {
        self.0.late_calls.load(Ordering::SeqCst)
    }
}

/// Stand-in for a native interface pointer.
pub struct Tracked {
    probe: Probe,
}

impl Tracked {
    pub fn touch(&self) -> AdsiResult<()> {
        let state = &self.probe.0;
        state.calls.fetch_add(1, Ordering::SeqCst);
        if state.releases.load(Ordering::SeqCst) > 0 {
            state.late_calls.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.probe.0.releases.fetch_add(1, Ordering::SeqCst);
    }
}

fn touch(tracked: Option<&Tracked>) {
    if let Some(tracked) = tracked {
        let _ = tracked.touch();
    }
}

/// One element of a fake enumeration.
#[derive(Clone, Debug)]
pub enum FakeElement {
    Object(FakeObject),
    /// An element whose VARIANT is not `VT_DISPATCH`.
    Foreign(u16),
}

impl From<FakeObject> for FakeElement {
    fn from(object: FakeObject) -> Self {
        Self::Object(object)
    }
}

#[derive(Clone, Debug)]
pub struct FakeObject {
    pub name: String,
    pub class: String,
    pub description: String,
    pub children: Vec<FakeElement>,
}

impl FakeObject {
    pub fn new(name: &str, class: &str) -> Self {
        Self {
            name: name.to_string(),
            class: class.to_string(),
            description: String::new(),
            children: Vec::new(),
        }
    }

    pub fn user(name: &str) -> Self {
        Self::new(name, "user")
    }

    pub fn group(name: &str, members: Vec<Self>) -> Self {
        Self::new(name, "group")
            .with_description(&format!("{name} members"))
            .with_children(members.into_iter().map(FakeElement::from).collect())
    }

    pub fn ou(name: &str, children: Vec<FakeElement>) -> Self {
        Self::new(name, "organizationalUnit").with_children(children)
    }

    pub fn with_children(mut self, children: Vec<FakeElement>) -> Self {
        self.children = children;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn relative_name(&self) -> String {
        format!("CN={}", self.name)
    }

    pub fn path(&self) -> String {
        path_for(&self.name)
    }
}

pub fn path_for(name: &str) -> String {
    format!("LDAP://CN={name},DC=example,DC=com")
}

fn name_from_path(path: &str) -> Option<&str> {
    path.strip_prefix("LDAP://CN=")?.split(',').next()
}

impl NativeObject for FakeObject {
    type Container = FakeCollection;
    type Group = FakeGroup;

    fn name(&self) -> AdsiResult<String> {
        Ok(self.relative_name())
    }

    fn class(&self) -> AdsiResult<String> {
        Ok(self.class.clone())
    }

    fn guid(&self) -> AdsiResult<String> {
        Ok(format!("{:032x}", self.name.len()))
    }

    fn path(&self) -> AdsiResult<String> {
        Ok(FakeObject::path(self))
    }

    fn parent(&self) -> AdsiResult<String> {
        Ok("LDAP://DC=example,DC=com".to_string())
    }

    fn schema(&self) -> AdsiResult<String> {
        Ok(format!("LDAP://schema/{}", self.class))
    }

    fn get(&self, property: &str) -> AdsiResult<Vec<String>> {
        match property {
            "cn" | "name" => Ok(vec![self.name.clone()]),
            "objectClass" => Ok(vec!["top".to_string(), self.class.clone()]),
            "description" if !self.description.is_empty() => Ok(vec![self.description.clone()]),
            _ => Err(PROPERTY_NOT_FOUND.into()),
        }
    }

    fn to_container(&self) -> AdsiResult<FakeCollection> {
        if CONTAINER_CLASSES.contains(&self.class.as_str()) {
            Ok(FakeCollection::new(self.children.clone()))
        } else {
            Err(E_NOINTERFACE.into())
        }
    }

    fn to_group(&self) -> AdsiResult<FakeGroup> {
        if self.class != "group" {
            return Err(E_NOINTERFACE.into());
        }
        let members = self
            .children
            .iter()
            .filter_map(|child| match child {
                FakeElement::Object(object) => Some(object.clone()),
                FakeElement::Foreign(_) => None,
            })
            .collect();
        Ok(FakeGroup {
            description: self.description.clone(),
            members: Mutex::new(members),
        })
    }
}

/// Container or member list.
pub struct FakeCollection {
    entries: Vec<FakeElement>,
    filter: Mutex<Vec<String>>,
    fail_enum: Option<HRESULT>,
    fail_next: Option<HRESULT>,
    tracked: Option<Tracked>,
}

impl FakeCollection {
    pub fn new(entries: Vec<FakeElement>) -> Self {
        Self {
            entries,
            filter: Mutex::new(Vec::new()),
            fail_enum: None,
            fail_next: None,
            tracked: None,
        }
    }

    pub fn of(objects: Vec<FakeObject>) -> Self {
        Self::new(objects.into_iter().map(FakeElement::from).collect())
    }

    pub fn tracked(mut self, probe: &Probe) -> Self {
        self.tracked = Some(probe.native());
        self
    }

    pub fn failing_enum(mut self, hr: HRESULT) -> Self {
        self.fail_enum = Some(hr);
        self
    }

    pub fn failing_next(mut self, hr: HRESULT) -> Self {
        self.fail_next = Some(hr);
        self
    }
}

impl NativeCollection for FakeCollection {
    type Cursor = FakeCursor;

    fn new_enum(&self) -> AdsiResult<FakeCursor> {
        touch(self.tracked.as_ref());
        if let Some(hr) = self.fail_enum {
            return Err(hr.into());
        }
        let filter = self.filter.lock().clone();
        let items = self
            .entries
            .iter()
            .filter(|entry| match entry {
                FakeElement::Object(object) => filter.is_empty() || filter.contains(&object.class),
                FakeElement::Foreign(_) => true,
            })
            .cloned()
            .collect();
        Ok(FakeCursor {
            items,
            fail_next: self.fail_next,
        })
    }

    fn filter(&self) -> AdsiResult<Vec<String>> {
        touch(self.tracked.as_ref());
        Ok(self.filter.lock().clone())
    }

    fn set_filter(&self, filter: &[String]) -> AdsiResult<()> {
        touch(self.tracked.as_ref());
        *self.filter.lock() = filter.to_vec();
        Ok(())
    }
}

impl NativeContainer for FakeCollection {
    fn get_object(&self, class: &str, relative_name: &str) -> AdsiResult<FakeObject> {
        touch(self.tracked.as_ref());
        self.entries
            .iter()
            .find_map(|entry| match entry {
                FakeElement::Object(object)
                    if object.relative_name().eq_ignore_ascii_case(relative_name)
                        && (class.is_empty() || object.class == class) =>
                {
                    Some(object.clone())
                }
                _ => None,
            })
            .ok_or_else(|| NO_SUCH_OBJECT.into())
    }
}

impl NativeMembers for FakeCollection {
    fn count(&self) -> AdsiResult<usize> {
        touch(self.tracked.as_ref());
        Ok(self.entries.len())
    }
}

pub struct FakeCursor {
    items: VecDeque<FakeElement>,
    fail_next: Option<HRESULT>,
}

impl NativeCursor for FakeCursor {
    type Object = FakeObject;

    fn next(&mut self) -> AdsiResult<Option<FakeObject>> {
        if let Some(hr) = self.fail_next.take() {
            return Err(hr.into());
        }
        match self.items.pop_front() {
            None => Ok(None),
            Some(FakeElement::Object(object)) => Ok(Some(object)),
            Some(FakeElement::Foreign(vt)) => Err(AdsiError::NonDispatchVariant { vt }),
        }
    }
}

pub struct FakeGroup {
    description: String,
    members: Mutex<Vec<FakeObject>>,
}

impl NativeGroup for FakeGroup {
    type Members = FakeCollection;

    fn description(&self) -> AdsiResult<String> {
        Ok(self.description.clone())
    }

    fn members(&self) -> AdsiResult<FakeCollection> {
        Ok(FakeCollection::of(self.members.lock().clone()))
    }

    fn is_member(&self, path: &str) -> AdsiResult<bool> {
        Ok(self.members.lock().iter().any(|m| m.path().eq_ignore_ascii_case(path)))
    }

    fn add(&self, path: &str) -> AdsiResult<()> {
        let name = name_from_path(path).ok_or_else(|| AdsiError::from(NO_SUCH_OBJECT))?;
        let mut members = self.members.lock();
        if members.iter().any(|m| m.path().eq_ignore_ascii_case(path)) {
            return Err(ALREADY_EXISTS.into());
        }
        members.push(FakeObject::user(name));
        Ok(())
    }

    fn remove(&self, path: &str) -> AdsiResult<()> {
        let mut members = self.members.lock();
        let before = members.len();
        members.retain(|m| !m.path().eq_ignore_ascii_case(path));
        if members.len() == before {
            return Err(NO_SUCH_OBJECT.into());
        }
        Ok(())
    }
}

/// Binds objects by path. The account `bad` is always rejected.
#[derive(Default)]
pub struct FakeDirectory {
    objects: HashMap<String, FakeObject>,
}

impl FakeDirectory {
    pub fn with(objects: Vec<FakeObject>) -> Self {
        Self {
            objects: objects.into_iter().map(|o| (o.path(), o)).collect(),
        }
    }
}

impl NativeDirectory for FakeDirectory {
    type Object = FakeObject;

    fn open(&self, path: &str, credentials: &Credentials) -> AdsiResult<FakeObject> {
        if credentials.username.as_deref() == Some("bad") {
            return Err(LOGON_FAILURE.into());
        }
        self.objects
            .get(path)
            .cloned()
            .ok_or_else(|| NO_SUCH_OBJECT.into())
    }
}
