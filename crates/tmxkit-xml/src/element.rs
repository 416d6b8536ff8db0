//! Owned XML element tree.

/// An XML element with its attributes, text content and children.
///
/// Attribute and child order is preserved exactly as written in the
/// document. Text content is the concatenation of the element's own text and
/// CDATA sections, with surrounding whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create a new element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an attribute to this element.
    pub fn attr_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Set the text content of this element.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add a child element.
    pub fn child_element(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Tag name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute's raw text by name.
    ///
    /// If the attribute is repeated, the first occurrence wins.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in document order.
    #[inline]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Trimmed text content (empty if the element has none).
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All child elements in document order.
    #[inline]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// The first child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given tag name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub(crate) fn push_attribute(&mut self, key: String, value: String) {
        self.attributes.push((key, value));
    }

    pub(crate) fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub(crate) fn append_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn trim_text(&mut self) {
        let trimmed = self.text.trim();
        if trimmed.len() != self.text.len() {
            self.text = trimmed.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlElement {
        XmlElement::new("objectgroup")
            .attr_value("name", "Walls")
            .attr_value("name", "Shadowed")
            .child_element(XmlElement::new("object").attr_value("id", "1"))
            .child_element(XmlElement::new("properties"))
            .child_element(XmlElement::new("object").attr_value("id", "2"))
    }

    #[test]
    fn test_first_attribute_wins() {
        let element = sample();
        assert_eq!(element.attr("name"), Some("Walls"));
        assert_eq!(element.attr("missing"), None);
        assert_eq!(element.attributes().len(), 2);
    }

    #[test]
    fn test_children_named_preserves_order() {
        let element = sample();
        let ids: Vec<_> = element
            .children_named("object")
            .filter_map(|c| c.attr("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(element.children().len(), 3);
        assert_eq!(element.child("properties").map(XmlElement::name), Some("properties"));
    }

    #[test]
    fn test_trim_text() {
        let mut element = XmlElement::new("data");
        element.append_text("\n  1,2,\n  3,4\n");
        element.trim_text();
        assert_eq!(element.text(), "1,2,\n  3,4");
    }
}
