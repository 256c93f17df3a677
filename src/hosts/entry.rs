//! Host entry model and validation.
//!
//! A [`HostEntry`] is either a mapping (address, hostname, aliases and an
//! optional trailing comment) or a comment-only line. Entries can only be
//! obtained through validation, so every value of the type is well formed
//! and its canonical line is always in sync with its fields.

use std::fmt;
use std::net::IpAddr;

use serde::{Serialize, Serializer};

use super::error::{FieldError, HostsError};
use super::name::{COMMENT_PREFIX, is_comment, is_valid_name};
use super::tokenize::tokenize;

/// Unvalidated field values for building an entry.
///
/// This is the editable form of an entry: take one with
/// [`HostEntry::to_fields`], change it, and turn it back into an entry with
/// [`EntryFields::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFields {
    /// IP address text; empty for a comment-only entry.
    pub ip: String,
    /// Canonical hostname; empty for a comment-only entry.
    pub hostname: String,
    /// Secondary names, in priority order.
    pub aliases: Vec<String>,
    /// Comment text including the leading `#`, or empty.
    pub comment: String,
}

impl EntryFields {
    /// Validates the fields and computes the canonical line.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Validation`] if:
    /// - the hostname or an alias looks like a comment
    /// - the entry is not comment-only and has no valid IP address
    /// - the hostname or an alias violates the name grammar
    /// - a non-empty comment does not start with `#`
    pub fn validate(self) -> Result<HostEntry, HostsError> {
        validate(self).map_err(HostsError::Validation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Record {
    CommentOnly(String),
    Mapping {
        ip: IpAddr,
        hostname: String,
        aliases: Vec<String>,
        comment: Option<String>,
    },
}

/// One logical line of a hosts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    position: usize,
    header: Vec<String>,
    record: Record,
    line: String,
}

impl HostEntry {
    /// Parses a single line into an entry.
    ///
    /// The first field must be an IP address unless the line is a comment;
    /// a malformed address is an error, never a silent downgrade to a
    /// comment.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Parse`] for empty lines, malformed fields, or
    /// any validation failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use hostctl::hosts::HostEntry;
    ///
    /// let entry = HostEntry::parse("10.0.0.1   web  w1 # rack 4").unwrap();
    /// assert_eq!(entry.hostname(), Some("web"));
    /// assert_eq!(entry.canonical_line(), "10.0.0.1\tweb\tw1\t# rack 4");
    /// ```
    pub fn parse(line: &str) -> Result<Self, HostsError> {
        Self::from_tokens(tokenize(line))
    }

    pub(crate) fn from_tokens(tokens: Vec<String>) -> Result<Self, HostsError> {
        let fields = fields_from_tokens(tokens).map_err(HostsError::parse)?;
        validate(fields).map_err(HostsError::parse)
    }

    /// Builds a mapping entry from field values.
    ///
    /// A non-empty `comment` without a leading `#` is prefixed with `"# "`.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Validation`] if the fields do not form a valid
    /// entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use hostctl::hosts::HostEntry;
    ///
    /// let entry = HostEntry::mapping("127.0.0.1", "localhost", "", ["loopback"]).unwrap();
    /// assert_eq!(entry.canonical_line(), "127.0.0.1\tlocalhost\tloopback");
    /// ```
    pub fn mapping<I, S>(ip: &str, hostname: &str, comment: &str, aliases: I) -> Result<Self, HostsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let comment = comment.trim();
        let comment = if comment.is_empty() || comment.starts_with(COMMENT_PREFIX) {
            comment.to_string()
        } else {
            format!("{COMMENT_PREFIX} {comment}")
        };

        EntryFields {
            ip: ip.to_string(),
            hostname: hostname.to_string(),
            aliases: aliases.into_iter().map(Into::into).collect(),
            comment,
        }
        .validate()
    }

    /// Builds a comment-only entry. The text must start with `#`.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Validation`] if the text is empty or not a
    /// comment.
    pub fn comment(text: &str) -> Result<Self, HostsError> {
        EntryFields {
            comment: text.to_string(),
            ..EntryFields::default()
        }
        .validate()
    }

    /// Attaches comment lines to be written immediately before this entry.
    ///
    /// # Errors
    ///
    /// Returns [`HostsError::Validation`] if a line is not a comment.
    pub fn with_header<I, S>(mut self, lines: I) -> Result<Self, HostsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut header = Vec::new();
        for line in lines {
            let line = line.into().trim().to_string();
            if !is_comment(&line) {
                return Err(HostsError::Validation(FieldError::UnprefixedComment(line)));
            }
            check_single_line(&line).map_err(HostsError::Validation)?;
            header.push(line);
        }
        self.header = header;
        Ok(self)
    }

    pub(crate) fn set_header(&mut self, header: Vec<String>) {
        self.header = header;
    }

    pub(crate) const fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Index of this entry in its store at the time it was read.
    ///
    /// Positions change after every insert or delete; do not hold on to
    /// them across mutations.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns true if the entry carries no address information.
    #[must_use]
    pub const fn is_comment_only(&self) -> bool {
        matches!(self.record, Record::CommentOnly(_))
    }

    /// Comment lines written immediately before this entry.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// The mapped address, `None` for comment-only entries.
    #[must_use]
    pub const fn ip_address(&self) -> Option<IpAddr> {
        match &self.record {
            Record::Mapping { ip, .. } => Some(*ip),
            Record::CommentOnly(_) => None,
        }
    }

    /// The canonical hostname, `None` for comment-only entries.
    #[must_use]
    pub fn hostname(&self) -> Option<&str> {
        match &self.record {
            Record::Mapping { hostname, .. } => Some(hostname.as_str()),
            Record::CommentOnly(_) => None,
        }
    }

    /// Secondary names in priority order.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        match &self.record {
            Record::Mapping { aliases, .. } => aliases.as_slice(),
            Record::CommentOnly(_) => &[],
        }
    }

    /// The trailing comment of a mapping, or the text of a comment-only
    /// entry.
    #[must_use]
    pub fn comment_text(&self) -> Option<&str> {
        match &self.record {
            Record::Mapping { comment, .. } => comment.as_deref(),
            Record::CommentOnly(text) => Some(text.as_str()),
        }
    }

    /// The normalized, tab-separated rendering of the entry's fields.
    #[must_use]
    pub fn canonical_line(&self) -> &str {
        &self.line
    }

    /// Returns the editable field values of this entry.
    #[must_use]
    pub fn to_fields(&self) -> EntryFields {
        match &self.record {
            Record::CommentOnly(text) => EntryFields {
                comment: text.clone(),
                ..EntryFields::default()
            },
            Record::Mapping {
                ip,
                hostname,
                aliases,
                comment,
            } => EntryFields {
                ip: ip.to_string(),
                hostname: hostname.clone(),
                aliases: aliases.clone(),
                comment: comment.clone().unwrap_or_default(),
            },
        }
    }

    pub(crate) fn ip_matches(&self, query: &str) -> bool {
        self.ip_address().is_some_and(|ip| ip.to_string() == query)
    }

    pub(crate) fn hostname_matches(&self, query: &str) -> bool {
        self.hostname() == Some(query)
    }

    pub(crate) fn alias_matches(&self, query: &str) -> bool {
        self.aliases().iter().any(|alias| alias == query)
    }
}

impl fmt::Display for HostEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

#[derive(Serialize)]
struct EntryView<'a> {
    position: usize,
    comment_only: bool,
    #[serde(skip_serializing_if = "no_items")]
    header: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    ip: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hostname: Option<&'a str>,
    #[serde(skip_serializing_if = "no_items")]
    aliases: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    line: &'a str,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde passes a reference to the field
fn no_items(items: &&[String]) -> bool {
    items.is_empty()
}

impl Serialize for HostEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EntryView {
            position: self.position,
            comment_only: self.is_comment_only(),
            header: &self.header,
            ip: self.ip_address(),
            hostname: self.hostname(),
            aliases: self.aliases(),
            comment: self.comment_text(),
            line: &self.line,
        }
        .serialize(serializer)
    }
}

/// Maps tokens onto field positions: address, hostname, then aliases,
/// until a comment token swallows the remainder.
fn fields_from_tokens(tokens: Vec<String>) -> Result<EntryFields, FieldError> {
    if tokens.is_empty() {
        return Err(FieldError::EmptyLine);
    }

    let mut fields = EntryFields::default();
    for (n, token) in tokens.into_iter().enumerate() {
        if token.starts_with(COMMENT_PREFIX) {
            fields.comment = token;
            break;
        }

        match n {
            0 => {
                if token.parse::<IpAddr>().is_err() {
                    return Err(FieldError::InvalidIp(token));
                }
                fields.ip = token;
            }
            1 => {
                if !is_valid_name(&token) {
                    return Err(FieldError::InvalidHostname(token));
                }
                fields.hostname = token;
            }
            _ => {
                if !is_valid_name(&token) {
                    return Err(FieldError::InvalidAlias {
                        index: n - 1,
                        value: token,
                    });
                }
                fields.aliases.push(token);
            }
        }
    }

    Ok(fields)
}

fn validate(fields: EntryFields) -> Result<HostEntry, FieldError> {
    let hostname = fields.hostname.trim();
    let aliases: Vec<&str> = fields.aliases.iter().map(|a| a.trim()).collect();
    let comment = fields.comment.trim();

    if is_comment(hostname) {
        return Err(FieldError::CommentHostname(hostname.to_string()));
    }
    if let Some((n, alias)) = aliases.iter().enumerate().find(|(_, a)| is_comment(a)) {
        return Err(FieldError::CommentAlias {
            index: n + 1,
            value: (*alias).to_string(),
        });
    }

    check_single_line(comment)?;

    let ip_text = fields.ip.trim();
    let ip = ip_text.parse::<IpAddr>().ok().map(|ip| ip.to_canonical());

    if ip.is_none() && !is_valid_name(hostname) && aliases.is_empty() && is_comment(comment) {
        return Ok(HostEntry {
            position: 0,
            header: Vec::new(),
            line: comment.to_string(),
            record: Record::CommentOnly(comment.to_string()),
        });
    }

    let ip = match ip {
        Some(ip) => ip,
        None if ip_text.is_empty() => return Err(FieldError::MissingIp),
        None => return Err(FieldError::InvalidIp(ip_text.to_string())),
    };
    if !is_valid_name(hostname) {
        return Err(FieldError::InvalidHostname(hostname.to_string()));
    }
    if let Some((n, alias)) = aliases.iter().enumerate().find(|(_, a)| !is_valid_name(a)) {
        return Err(FieldError::InvalidAlias {
            index: n + 1,
            value: (*alias).to_string(),
        });
    }
    if !comment.is_empty() && !is_comment(comment) {
        return Err(FieldError::UnprefixedComment(comment.to_string()));
    }

    let aliases: Vec<String> = aliases.into_iter().map(str::to_string).collect();
    let comment = (!comment.is_empty()).then(|| comment.to_string());
    let line = canonical_line(ip, hostname, &aliases, comment.as_deref());

    Ok(HostEntry {
        position: 0,
        header: Vec::new(),
        line,
        record: Record::Mapping {
            ip,
            hostname: hostname.to_string(),
            aliases,
            comment,
        },
    })
}

/// Rejects comment text that would render as more than one physical line.
pub(crate) fn check_single_line(text: &str) -> Result<(), FieldError> {
    if text.contains(['\r', '\n']) {
        return Err(FieldError::MultilineComment(text.to_string()));
    }
    Ok(())
}

/// Joins the fields with single tabs in fixed order, aliases space-joined.
fn canonical_line(ip: IpAddr, hostname: &str, aliases: &[String], comment: Option<&str>) -> String {
    let mut line = format!("{ip}\t{hostname}");
    if !aliases.is_empty() {
        line.push('\t');
        line.push_str(&aliases.join(" "));
    }
    if let Some(comment) = comment {
        line.push('\t');
        line.push_str(comment);
    }
    line
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
