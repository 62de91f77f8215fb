/// The PackURI value type: a partname within an OPC package.
///
/// PackURIs always begin with a forward slash and use forward slashes as
/// separators, per the OPC specification. The type offers the path algebra
/// the rest of the crate needs: directory, filename, extension, the ZIP
/// membername form, and translation between absolute partnames and the
/// relative references used inside `.rels` files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a new PackURI from a string.
    ///
    /// Fails when the URI does not begin with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{uri}'"));
        }
        Ok(PackURI { uri })
    }

    /// Resolve a relative reference (e.g. `../media/image1.png`) against a
    /// base URI (e.g. `/ppt/slides`) into an absolute PackURI.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self, String> {
        let mut segments: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();

        for segment in relative_ref.split('/') {
            match segment {
                "" | "." => {},
                ".." => {
                    segments.pop();
                },
                other => segments.push(other),
            }
        }

        Self::new(format!("/{}", segments.join("/")))
    }

    /// The directory portion, e.g. `/ppt/slides` for `/ppt/slides/slide1.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// The filename portion, e.g. `slide1.xml`.
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// The extension without its leading period, e.g. `xml`.
    pub fn ext(&self) -> &str {
        match self.filename().rfind('.') {
            Some(pos) => &self.filename()[pos + 1..],
            None => "",
        }
    }

    /// The ZIP membername form: the URI with the leading slash stripped.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// The relative reference from `base_uri` to this PackURI, as written
    /// into `.rels` files (e.g. `../media/image1.png` from `/ppt/slides`).
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        let common = from
            .iter()
            .zip(to.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut result = String::new();
        for _ in common..from.len() {
            result.push_str("../");
        }
        for (i, segment) in to.iter().enumerate().skip(common) {
            if i > common {
                result.push('/');
            }
            result.push_str(segment);
        }
        result
    }

    /// The PackURI of the `.rels` part for this partname, e.g.
    /// `/ppt/slides/_rels/slide1.xml.rels` for `/ppt/slides/slide1.xml`.
    pub fn rels_uri(&self) -> Result<PackURI, String> {
        let base = self.base_uri();
        if base == "/" {
            Self::new(format!("/_rels/{}.rels", self.filename()))
        } else {
            Self::new(format!("{base}/_rels/{}.rels", self.filename()))
        }
    }

    /// The full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// The pseudo-partname for the package itself.
pub const PACKAGE_URI: &str = "/";

/// The partname of the content types index.
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_leading_slash() {
        assert!(PackURI::new("/ppt/presentation.xml").is_ok());
        assert!(PackURI::new("ppt/presentation.xml").is_err());
    }

    #[test]
    fn test_path_components() {
        let uri = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        assert_eq!(uri.base_uri(), "/ppt/slides");
        assert_eq!(uri.filename(), "slide1.xml");
        assert_eq!(uri.ext(), "xml");
        assert_eq!(uri.membername(), "ppt/slides/slide1.xml");
    }

    #[test]
    fn test_from_rel_ref() {
        let uri = PackURI::from_rel_ref("/ppt/slides", "../media/image1.png").unwrap();
        assert_eq!(uri.as_str(), "/ppt/media/image1.png");

        let uri = PackURI::from_rel_ref("/ppt", "slides/slide3.xml").unwrap();
        assert_eq!(uri.as_str(), "/ppt/slides/slide3.xml");

        let uri = PackURI::from_rel_ref("/", "ppt/presentation.xml").unwrap();
        assert_eq!(uri.as_str(), "/ppt/presentation.xml");
    }

    #[test]
    fn test_relative_ref_round_trip() {
        let uri = PackURI::new("/ppt/media/image1.png").unwrap();
        let rel = uri.relative_ref("/ppt/slides");
        assert_eq!(rel, "../media/image1.png");
        assert_eq!(
            PackURI::from_rel_ref("/ppt/slides", &rel).unwrap(),
            uri
        );
    }

    #[test]
    fn test_rels_uri() {
        let uri = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        assert_eq!(
            uri.rels_uri().unwrap().as_str(),
            "/ppt/slides/_rels/slide1.xml.rels"
        );

        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        assert_eq!(
            pres.rels_uri().unwrap().as_str(),
            "/ppt/_rels/presentation.xml.rels"
        );
    }
}
