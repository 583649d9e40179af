//! Identity normalization.
//!
//! People show up in an archive under several names: old display names,
//! bare UIDs (`12345@facebook.com`) or a second account. This module maps all
//! of them to one canonical name per person and rewrites thread titles and
//! message senders accordingly.
//!
//! # Building the alias table
//!
//! ```
//! use threadpack::identity::{AliasTable, OwnerIdentity, ReplacementNames};
//!
//! let owner = OwnerIdentity::new().with_uid("12345").with_name("Me");
//!
//! let mut replacements = ReplacementNames::new();
//! replacements.insert("John Smith", "John H Smith");
//! replacements.insert("John Smith", "7890@facebook.com");
//!
//! let table = AliasTable::build(&replacements, &owner);
//! assert_eq!(table.resolve("12345@facebook.com"), "Me");
//! assert_eq!(table.resolve("7890@facebook.com"), "John Smith");
//! assert_eq!(table.resolve("Jane Doe"), "Jane Doe");
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThreadpackError};
use crate::message::Message;
use crate::thread::ThreadFragment;

/// Suffix the archive appends to numeric user IDs.
pub const UID_DOMAIN: &str = "@facebook.com";

/// Separator between participant names in raw thread titles.
pub const TITLE_SEPARATOR: &str = ", ";

/// Separator between participant names in resolved thread titles.
pub const RESOLVED_SEPARATOR: &str = ",";

/// The person who exported the archive.
///
/// # Example
///
/// ```
/// use threadpack::identity::OwnerIdentity;
///
/// let owner = OwnerIdentity::new()
///     .with_uid("12345")
///     .with_alias("Old Name");
///
/// assert_eq!(owner.uid(), Some("12345@facebook.com"));
/// // With no display name, the first alias is canonical
/// assert_eq!(owner.canonical_name(), Some("Old Name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerIdentity {
    #[serde(default, deserialize_with = "deserialize_uid")]
    uid: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
}

impl OwnerIdentity {
    /// Creates an empty identity. Owner removal is a no-op until one of
    /// UID, name or alias is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the UID. Bare digits get the archive's domain suffix appended.
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(normalize_uid(&uid.into()));
        self
    }

    /// Sets the preferred display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a name that also refers to the owner.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Returns the normalized UID.
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    /// Returns the configured aliases.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns the name every owner alias resolves to: the display name, else
    /// the first alias, else the UID.
    pub fn canonical_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.aliases.first().map(String::as_str))
            .or(self.uid.as_deref())
    }

    /// Returns `true` if no identity information was given.
    pub fn is_empty(&self) -> bool {
        self.canonical_name().is_none()
    }

    /// Returns every string that refers to the owner.
    pub fn all_names(&self) -> BTreeSet<&str> {
        self.name
            .as_deref()
            .into_iter()
            .chain(self.aliases.iter().map(String::as_str))
            .chain(self.uid.as_deref())
            .collect()
    }

    /// Returns `true` if `name` refers to the owner.
    pub fn is_owner(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
            || self.uid.as_deref() == Some(name)
            || self.aliases.iter().any(|a| a == name)
    }
}

/// Appends [`UID_DOMAIN`] to an all-digit UID.
pub fn normalize_uid(uid: &str) -> String {
    if !uid.is_empty() && uid.chars().all(|c| c.is_ascii_digit()) {
        format!("{uid}{UID_DOMAIN}")
    } else {
        uid.to_string()
    }
}

fn deserialize_uid<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let uid = Option::<String>::deserialize(deserializer)?;
    Ok(uid.map(|uid| normalize_uid(&uid)))
}

/// Canonical name → known variants, as supplied by the user.
///
/// Loaded from a `variant=Canonical Name` file with [`ReplacementNames::load`]
/// or filled in code with [`ReplacementNames::insert`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementNames {
    names: BTreeMap<String, Vec<String>>,
}

impl ReplacementNames {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `variant` under `canonical`, creating the entry if needed.
    pub fn insert(&mut self, canonical: impl Into<String>, variant: impl Into<String>) {
        self.names
            .entry(canonical.into())
            .or_default()
            .push(variant.into());
    }

    /// Returns the variants registered for `canonical`.
    pub fn variants(&self, canonical: &str) -> &[String] {
        self.names.get(canonical).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates `(canonical, variants)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns `true` if no replacement is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Parses replacement lines of the form `John H Smith=John Smith`.
    ///
    /// Blank lines and lines starting with `#` or `;` are ignored. Names keep
    /// their case.
    pub fn parse(content: &str) -> Result<Self> {
        let mut names = Self::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let Some((variant, canonical)) = line.split_once('=') else {
                return Err(ThreadpackError::invalid_replacement(index + 1, line));
            };
            let (variant, canonical) = (variant.trim(), canonical.trim());
            if variant.is_empty() || canonical.is_empty() {
                return Err(ThreadpackError::invalid_replacement(index + 1, line));
            }
            names.insert(canonical, variant);
        }
        Ok(names)
    }

    /// Reads and parses a replacement file.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadpackError::InputNotFound`] if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ThreadpackError::input_not_found("replacements", path));
        }
        Self::parse(&fs::read_to_string(path)?)
    }
}

/// Variant → canonical name lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    /// Inverts the replacement mapping and adds the owner's names.
    ///
    /// Replacements are registered first and the owner last; when a variant
    /// is registered twice the later canonical name wins.
    pub fn build(replacements: &ReplacementNames, owner: &OwnerIdentity) -> Self {
        let mut table = Self::default();
        for (canonical, variants) in replacements.iter() {
            for variant in variants {
                table.register(variant, canonical);
            }
        }
        if let Some(canonical) = owner.canonical_name() {
            for name in owner.all_names() {
                table.register(name, canonical);
            }
        }
        table
    }

    /// Maps `variant` to `canonical`, replacing any earlier mapping.
    pub fn register(&mut self, variant: impl Into<String>, canonical: impl Into<String>) {
        self.aliases.insert(variant.into(), canonical.into());
    }

    /// Returns the canonical name for `name`, or `name` itself.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// Returns `true` if `name` is a registered variant.
    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Returns the number of registered variants.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns `true` if no variant is registered.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// A fragment after identity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFragment {
    /// Final title, the merge key.
    pub title: String,
    /// Distinct title participants, sorted.
    pub participants: Vec<String>,
    /// Messages with canonical senders, chronological.
    pub messages: Vec<Message>,
}

impl ResolvedFragment {
    /// Returns the timestamp of the oldest message, if any.
    pub fn first_timestamp(&self) -> Option<chrono::NaiveDateTime> {
        self.messages.first().map(Message::timestamp)
    }
}

/// Resolves a fragment's title and senders through `table`.
///
/// The steps run in this order:
/// 1. split the raw title on `", "`
/// 2. replace each alias with its canonical name
/// 3. drop owner names while more than one name remains
/// 4. deduplicate
/// 5. join with `,`
/// 6. rewrite message senders (the owner's own messages keep the owner)
///
/// # Errors
///
/// Returns [`ThreadpackError::EmptyTitle`] if no name is left.
pub fn resolve_fragment(
    fragment: ThreadFragment,
    table: &AliasTable,
    owner: &OwnerIdentity,
) -> Result<ResolvedFragment> {
    let (title_raw, messages) = fragment.into_parts();

    let mut names: Vec<&str> = title_raw
        .split(TITLE_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| table.resolve(name))
        .collect();

    let mut i = 0;
    while i < names.len() {
        if names.len() > 1 && owner.is_owner(names[i]) {
            names.remove(i);
        } else {
            i += 1;
        }
    }

    let participants: Vec<String> = names
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let title = match participants.as_slice() {
        [] => return Err(ThreadpackError::empty_title(title_raw)),
        [only] => only.clone(),
        many => many.join(RESOLVED_SEPARATOR),
    };

    let messages = messages
        .into_iter()
        .map(|m| {
            let sender = table.resolve(m.sender()).to_string();
            m.with_sender(sender)
        })
        .collect();

    Ok(ResolvedFragment {
        title,
        participants,
        messages,
    })
}
