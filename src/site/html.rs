//! A small typed render tree for server-side HTML.
//!
//! Components build [`Node`] values; nothing is turned into markup until
//! [`Node::to_html`], which escapes every text node and attribute value.

use std::fmt::Write as _;

use crate::utils::markdown::safe_markdown_to_html;

/// Escape HTML special characters.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 10);
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Markup that has already been sanitized and is emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    /// Renders markdown and runs the result through the sanitizer.
    pub fn from_markdown(markdown: &str) -> Self {
        SafeHtml(safe_markdown_to_html(markdown))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Raw(SafeHtml),
    Fragment(Vec<Node>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
    is_void: bool,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        let is_void = matches!(
            tag,
            "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
                | "source" | "track" | "wbr"
        );
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            is_void,
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<SafeHtml> for Node {
    fn from(html: SafeHtml) -> Self {
        Node::Raw(html)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Self {
        Node::Fragment(nodes)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(node: Option<T>) -> Self {
        node.map_or(Node::Empty, Into::into)
    }
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut output = String::new();
        self.write_html(&mut output);
        output
    }

    fn write_html(&self, output: &mut String) {
        match self {
            Node::Element(el) => {
                output.push('<');
                output.push_str(el.tag);
                for (name, value) in &el.attrs {
                    let _ = write!(output, " {}=\"{}\"", name, escape_html(value));
                }
                if el.is_void {
                    output.push_str(" />");
                } else {
                    output.push('>');
                    for child in &el.children {
                        child.write_html(output);
                    }
                    output.push_str("</");
                    output.push_str(el.tag);
                    output.push('>');
                }
            }
            Node::Text(text) => output.push_str(&escape_html(text)),
            Node::Raw(html) => output.push_str(html.as_str()),
            Node::Fragment(children) => {
                for child in children {
                    child.write_html(output);
                }
            }
            Node::Empty => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let node: Node = Element::new("a")
            .attr("title", "\"quoted\" & <b>")
            .text("<script>alert('x')</script>")
            .into();

        assert_eq!(
            node.to_html(),
            "<a title=\"&quot;quoted&quot; &amp; &lt;b&gt;\">&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;</a>"
        );
    }

    #[test]
    fn void_elements_self_close() {
        let node: Node = Element::new("img").attr("src", "https://x.test/a.png").into();
        assert_eq!(node.to_html(), "<img src=\"https://x.test/a.png\" />");
    }

    #[test]
    fn raw_html_is_emitted_verbatim() {
        let node: Node = Element::new("div")
            .child(SafeHtml::from_markdown("**bold**"))
            .into();
        assert!(node.to_html().contains("<strong>bold</strong>"));
    }
}
