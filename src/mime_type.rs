//! The MIME type record: one definition of a media type, its extension
//! associations, transfer encoding, platform scope, and documentation.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::grammar;
use crate::platform::PLATFORM;
use crate::urls::{expand, ResolvedUrl};

/// Simplified identifiers of the known digital-signature types.
const SIGNATURES: &[&str] = &[
    "application/pgp-keys",
    "application/pgp",
    "application/pgp-signature",
    "application/pkcs10",
    "application/pkcs7-mime",
    "application/pkcs7-signature",
    "text/vcard",
];

static USE_INSTEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"use-instead:([-\w.+]+)/([-\w.+]*)").unwrap());

/// Content transfer encoding vocabulary.
///
/// `Default` is a stored sentinel: it resolves at read time to
/// `QuotedPrintable` for `text` media types and `Base64` for everything
/// else. [`MimeType::encoding`] performs that resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Unset; resolved against the record's media type when read.
    #[default]
    Default,
    /// Base64 binary encoding.
    Base64,
    /// 7bit text.
    SevenBit,
    /// 8bit text.
    EightBit,
    /// Quoted-printable text.
    QuotedPrintable,
}

impl Encoding {
    /// Returns the wire token for this encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Default => "default",
            Encoding::Base64 => "base64",
            Encoding::SevenBit => "7bit",
            Encoding::EightBit => "8bit",
            Encoding::QuotedPrintable => "quoted-printable",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Encoding::Default),
            "base64" => Ok(Encoding::Base64),
            "7bit" => Ok(Encoding::SevenBit),
            "8bit" => Ok(Encoding::EightBit),
            "quoted-printable" => Ok(Encoding::QuotedPrintable),
            other => Err(Error::InvalidEncoding(other.to_string())),
        }
    }
}

/// One MIME type definition.
///
/// The identifier fields (`simplified`, `media_type`, `sub_type`) are
/// derived from `content_type` at construction and never mutated
/// independently.
///
/// # Examples
///
/// ```
/// use mime_registry::MimeType;
///
/// let mut t = MimeType::new("text/plain").unwrap();
/// t.set_extensions(["txt", "asc"]);
/// assert_eq!(t.media_type(), "text");
/// assert_eq!(t.encoding().as_str(), "quoted-printable");
/// assert!(t.is_ascii());
/// assert!(t.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct MimeType {
    content_type: String,
    raw_media_type: String,
    raw_sub_type: String,
    simplified: String,
    media_type: String,
    sub_type: String,
    extensions: Vec<String>,
    encoding: Encoding,
    system: Option<Regex>,
    obsolete: bool,
    registered: bool,
    docs: Option<String>,
    use_instead: Option<Vec<String>>,
    urls: Vec<String>,
}

impl MimeType {
    /// Builds a record from a `media/sub` content type string.
    ///
    /// The string must match the identifier grammar in full; anything else
    /// is `Error::InvalidContentType`.
    pub fn new(content_type: &str) -> Result<MimeType> {
        let (raw_media_type, raw_sub_type) = grammar::split_identifier(content_type)
            .ok_or_else(|| Error::InvalidContentType(content_type.to_string()))?;
        let media_type = grammar::simplify_segment(raw_media_type);
        let sub_type = grammar::simplify_segment(raw_sub_type);
        let simplified = format!("{}/{}", media_type, sub_type);

        Ok(MimeType {
            content_type: content_type.to_string(),
            raw_media_type: raw_media_type.to_string(),
            raw_sub_type: raw_sub_type.to_string(),
            simplified,
            media_type,
            sub_type,
            extensions: Vec::new(),
            encoding: Encoding::Default,
            system: None,
            obsolete: false,
            registered: true,
            docs: None,
            use_instead: None,
            urls: Vec::new(),
        })
    }

    /// Convenience constructor covering the common fields in one call.
    pub fn from_parts<I, S>(
        content_type: &str,
        extensions: I,
        encoding: Encoding,
        system: Option<&str>,
    ) -> Result<MimeType>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut t = MimeType::new(content_type)?;
        t.set_extensions(extensions);
        t.set_encoding(encoding);
        t.set_system(system)?;
        Ok(t)
    }

    /// The whole content type, verbatim as given.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The media segment with its original case.
    pub fn raw_media_type(&self) -> &str {
        &self.raw_media_type
    }

    /// The sub-type segment with its original case.
    pub fn raw_sub_type(&self) -> &str {
        &self.raw_sub_type
    }

    /// The normalized identifier used for equality and indexing.
    pub fn simplified(&self) -> &str {
        &self.simplified
    }

    /// The normalized media segment.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// The normalized sub-type segment.
    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    /// File extensions associated with this type, in definition order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Replaces the extension list. Empty entries are discarded.
    pub fn set_extensions<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(Into::into)
            .filter(|e| !e.is_empty())
            .collect();
    }

    /// The resolved transfer encoding.
    ///
    /// A stored `Default` resolves to quoted-printable for `text` media
    /// types and base64 otherwise; the stored value is never rewritten.
    pub fn encoding(&self) -> Encoding {
        match self.encoding {
            Encoding::Default => self.default_encoding(),
            enc => enc,
        }
    }

    /// The stored encoding, `Default` sentinel included.
    pub fn raw_encoding(&self) -> Encoding {
        self.encoding
    }

    /// The encoding a `Default` sentinel resolves to for this record.
    pub fn default_encoding(&self) -> Encoding {
        if self.media_type == "text" {
            Encoding::QuotedPrintable
        } else {
            Encoding::Base64
        }
    }

    /// Sets the stored transfer encoding.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// The operating-system matcher, if this record is system-specific.
    pub fn system(&self) -> Option<&Regex> {
        self.system.as_ref()
    }

    /// Sets or clears the operating-system matcher.
    pub fn set_system(&mut self, pattern: Option<&str>) -> Result<()> {
        self.system = match pattern {
            Some(p) => Some(Regex::new(p)?),
            None => None,
        };
        Ok(())
    }

    /// Whether this definition is obsolete.
    pub fn is_obsolete(&self) -> bool {
        self.obsolete
    }

    /// Marks the definition obsolete or current.
    pub fn set_obsolete(&mut self, obsolete: bool) {
        self.obsolete = obsolete;
    }

    /// Sets the explicit registration flag.
    ///
    /// Note that [`MimeType::is_registered`] also inspects the raw
    /// segments for `x-` markers.
    pub fn set_registered(&mut self, registered: bool) {
        self.registered = registered;
    }

    /// Free-text documentation for this definition.
    pub fn docs(&self) -> Option<&str> {
        self.docs.as_deref()
    }

    /// Sets the documentation string, extracting any
    /// `use-instead:media/sub` references it carries.
    pub fn set_docs(&mut self, docs: Option<&str>) {
        self.use_instead = docs.and_then(|d| {
            let refs: Vec<String> = USE_INSTEAD_RE
                .captures_iter(d)
                .map(|caps| format!("{}/{}", &caps[1], &caps[2]))
                .collect();
            if refs.is_empty() {
                None
            } else {
                Some(refs)
            }
        });
        self.docs = docs.map(str::to_string);
    }

    /// Replacement identifiers for an obsolete definition.
    ///
    /// Always `None` while the record is current, whatever the docs say.
    pub fn use_instead(&self) -> Option<&[String]> {
        if !self.obsolete {
            return None;
        }
        self.use_instead.as_deref()
    }

    /// The raw, unexpanded URL tokens.
    pub fn url_tokens(&self) -> &[String] {
        &self.urls
    }

    /// Replaces the URL token list. Empty entries are discarded.
    pub fn set_urls<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls
            .into_iter()
            .map(Into::into)
            .filter(|u| !u.is_empty())
            .collect();
    }

    /// Expands every URL token for this record. Computed on each call,
    /// never stored.
    pub fn urls(&self) -> Vec<ResolvedUrl> {
        self.urls
            .iter()
            .map(|token| expand(token, &self.media_type, &self.sub_type))
            .collect()
    }

    /// True when the definition is registered and neither raw segment
    /// carries an `x-` experimental marker.
    pub fn is_registered(&self) -> bool {
        if has_unregistered_marker(&self.raw_media_type)
            || has_unregistered_marker(&self.raw_sub_type)
        {
            return false;
        }
        self.registered
    }

    /// True when the resolved encoding is base64.
    pub fn is_binary(&self) -> bool {
        self.encoding() == Encoding::Base64
    }

    /// True when the resolved encoding is not base64.
    pub fn is_ascii(&self) -> bool {
        !self.is_binary()
    }

    /// True when this is one of the known digital-signature types.
    pub fn is_signature(&self) -> bool {
        SIGNATURES.contains(&self.simplified.to_lowercase().as_str())
    }

    /// True when the definition is specific to some operating system.
    pub fn is_system(&self) -> bool {
        self.system.is_some()
    }

    /// True when the definition is specific to the current platform.
    pub fn is_platform(&self) -> bool {
        self.system
            .as_ref()
            .map(|re| re.is_match(PLATFORM))
            .unwrap_or(false)
    }

    /// True when at least one file extension is associated.
    pub fn is_complete(&self) -> bool {
        !self.extensions.is_empty()
    }

    /// Compares against a bare identifier string, normalizing it first.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        grammar::simplify(identifier)
            .map(|s| s == self.simplified)
            .unwrap_or(false)
    }

    /// Ranks two variants of the same logical type by reliability.
    ///
    /// Only meaningful between records with equal `simplified` values;
    /// that precondition is debug-asserted. Criteria, in order:
    /// registered before unregistered, generic before platform-specific,
    /// complete before incomplete, current before obsolete, and among
    /// obsolete records one without use-instead references before one
    /// with (both present compare lexicographically).
    pub fn priority_cmp(&self, other: &MimeType) -> Ordering {
        debug_assert_eq!(
            self.simplified, other.simplified,
            "priority_cmp requires variants of the same simplified identifier"
        );
        match (self.is_registered(), other.is_registered()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        match (self.is_system(), other.is_system()) {
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            _ => {}
        }
        match (self.is_complete(), other.is_complete()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        match (self.obsolete, other.obsolete) {
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            _ => {}
        }
        if self.obsolete {
            match (self.use_instead(), other.use_instead()) {
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
                (None, None) => Ordering::Equal,
            }
        } else {
            Ordering::Equal
        }
    }
}

fn has_unregistered_marker(segment: &str) -> bool {
    segment.len() >= 2 && segment[..2].eq_ignore_ascii_case("x-")
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content_type)
    }
}

impl PartialEq for MimeType {
    /// Two records are equal iff their content types match
    /// case-insensitively.
    fn eq(&self, other: &Self) -> bool {
        self.content_type.eq_ignore_ascii_case(&other.content_type)
    }
}

impl Eq for MimeType {}

impl PartialOrd for MimeType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MimeType {
    /// Case-insensitive lexicographic order on the content type.
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.content_type.bytes().map(|b| b.to_ascii_lowercase());
        let b = other.content_type.bytes().map(|b| b.to_ascii_lowercase());
        a.cmp(b)
    }
}
