/// Location values consumed from the history backend
///
/// Only `pathname` takes part in matching. The rest is carried through
/// untouched so descendants see the location exactly as the backend
/// reported it.
use serde::{Deserialize, Serialize};

/// A navigational position
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    /// Query string including the leading `?`, or empty
    #[serde(default)]
    pub search: String,
    /// Fragment including the leading `#`, or empty
    #[serde(default)]
    pub hash: String,
    /// Backend-assigned identity of this entry, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Location {
    /// Location with only a pathname
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            ..Self::default()
        }
    }

    /// Splits a path string into pathname, search and hash
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_navigator::Location;
    ///
    /// let location = Location::parse("/users/7?tab=posts#latest");
    /// assert_eq!(location.pathname, "/users/7");
    /// assert_eq!(location.search, "?tab=posts");
    /// assert_eq!(location.hash, "#latest");
    ///
    /// assert_eq!(Location::parse("").pathname, "/");
    /// ```
    pub fn parse(path: &str) -> Self {
        let path = if path.is_empty() { "/" } else { path };

        let (rest, hash) = match path.find('#') {
            Some(i) => path.split_at(i),
            None => (path, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };

        Self {
            pathname: pathname.to_string(),
            search: if search == "?" { "" } else { search }.to_string(),
            hash: if hash == "#" { "" } else { hash }.to_string(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Joins the location back into a path string
    ///
    /// ```
    /// use rhtmx_navigator::Location;
    ///
    /// assert_eq!(Location::parse("/a?b=1#c").href(), "/a?b=1#c");
    /// ```
    pub fn href(&self) -> String {
        let mut href = self.pathname.clone();
        if !self.search.is_empty() {
            if !self.search.starts_with('?') {
                href.push('?');
            }
            href.push_str(&self.search);
        }
        if !self.hash.is_empty() {
            if !self.hash.starts_with('#') {
                href.push('#');
            }
            href.push_str(&self.hash);
        }
        href
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Location::parse(path)
    }
}

impl From<String> for Location {
    fn from(path: String) -> Self {
        Location::parse(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        assert_eq!(Location::parse("/about"), Location::new("/about"));
    }

    #[test]
    fn test_parse_drops_bare_markers() {
        let location = Location::parse("/a?#");
        assert_eq!(location.pathname, "/a");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "");
    }

    #[test]
    fn test_hash_may_contain_question_mark() {
        let location = Location::parse("/a#b?c");
        assert_eq!(location.pathname, "/a");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "#b?c");
    }

    #[test]
    fn test_href_adds_missing_markers() {
        let location = Location {
            pathname: "/a".into(),
            search: "x=1".into(),
            hash: "top".into(),
            key: None,
        };
        assert_eq!(location.href(), "/a?x=1#top");
    }
}
