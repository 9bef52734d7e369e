use adsi::{AdsiError, AdsiResult, Client, Container, Credentials, Object, codes};
use anyhow::{Context, Result};
#[cfg(test)]
use mockall::automock;

/// One directory object as printed by the commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub class: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Details {
    pub entry: Entry,
    pub guid: String,
    pub parent: String,
    pub schema: String,
    /// Requested properties in order; `None` when the object has no value.
    pub properties: Vec<(String, Option<Vec<String>>)>,
}

/// Directory operations the commands are written against.
#[cfg_attr(test, automock)]
pub trait DirectorySession {
    /// Children of the container at `path`, restricted to `classes` when
    /// non-empty.
    fn list(&self, path: &str, classes: &[String]) -> Result<Vec<Entry>>;

    fn members(&self, group: &str) -> Result<Vec<Entry>>;

    fn show(&self, path: &str, properties: &[String]) -> Result<Details>;

    /// Installed providers (`LDAP:`, `WinNT:`, ...).
    fn namespaces(&self) -> Result<Vec<Entry>>;
}

/// [`DirectorySession`] backed by the ADSI LDAP provider.
pub struct AdsiSession {
    server: Option<String>,
    client: Client,
}

impl AdsiSession {
    pub fn connect(server: Option<&str>, credentials: Credentials) -> Result<Self> {
        let client = Client::connect(server)
            .with_context(|| format!("failed to activate the LDAP provider on {}", server.unwrap_or("localhost")))?
            .with_credentials(credentials);
        Ok(Self {
            server: server.map(str::to_string),
            client,
        })
    }
}

fn entry(object: &Object) -> AdsiResult<Entry> {
    Ok(Entry {
        name: object.name()?,
        class: object.class()?,
        path: object.path()?,
    })
}

fn collect(objects: adsi::ObjectIter) -> AdsiResult<Vec<Entry>> {
    objects.map(|object| entry(&object?)).collect()
}

fn children(container: &Container) -> AdsiResult<Vec<Entry>> {
    collect(container.children()?)
}

impl DirectorySession for AdsiSession {
    fn list(&self, path: &str, classes: &[String]) -> Result<Vec<Entry>> {
        let container = self
            .client
            .open_container(path)
            .with_context(|| format!("failed to open container {path}"))?;
        if !classes.is_empty() {
            container
                .set_filter(classes.iter().cloned())
                .context("failed to set class filter")?;
        }
        children(&container).with_context(|| format!("failed to enumerate {path}"))
    }

    fn members(&self, group: &str) -> Result<Vec<Entry>> {
        let group_handle = self
            .client
            .open_group(group)
            .with_context(|| format!("failed to open group {group}"))?;
        let members = group_handle.members().context("failed to read group members")?;
        collect(members.iter()?).with_context(|| format!("failed to enumerate members of {group}"))
    }

    fn show(&self, path: &str, properties: &[String]) -> Result<Details> {
        let object = self
            .client
            .open(path)
            .with_context(|| format!("failed to open {path}"))?;

        let mut values = Vec::with_capacity(properties.len());
        for property in properties {
            let value = match object.get(property) {
                Ok(value) => Some(value),
                Err(e) if e.code() == Some(codes::PROPERTY_NOT_FOUND) => None,
                Err(e) => return Err(e).with_context(|| format!("failed to read {property}")),
            };
            values.push((property.clone(), value));
        }

        Ok(Details {
            entry: entry(&object)?,
            guid: object.guid()?,
            parent: object.parent()?,
            schema: object.schema()?,
            properties: values,
        })
    }

    fn namespaces(&self) -> Result<Vec<Entry>> {
        let namespaces = Container::namespaces(self.server.as_deref())
            .context("failed to open the ADs: namespace container")?;
        Ok(children(&namespaces)?)
    }
}

/// Finds the hint for the first ADSI error in an error chain.
pub fn hint(error: &anyhow::Error) -> Option<&'static str> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<AdsiError>())
        .and_then(AdsiError::hint)
}
