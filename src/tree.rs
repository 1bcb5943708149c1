//! 语法分析树, 由分析器在喂入终结符的过程中增量构建.

use std::fmt::{Debug, Display};

use crate::Token;

/// 树节点的编号, 只在所属 [`ParseTree`] 内有效.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!("n{}", self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node<'a> {
    token: Token<'a>,
    children: Vec<NodeId>,
}

/// 分析树. 节点集中存放, 节点间通过 [`NodeId`] 互相引用, 根节点在创建时固定.
///
/// 每个节点携带一个文法符号和按从左到右顺序排列的子节点.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree<'a> {
    nodes: Vec<Node<'a>>,
}

impl<'a> ParseTree<'a> {
    #[must_use]
    pub(crate) fn new(root: Token<'a>) -> Self {
        Self {
            nodes: vec![Node {
                token: root,
                children: Vec::new(),
            }],
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn symbol(&self, id: NodeId) -> Token<'a> {
        self.nodes[id.0].token
    }

    /// 某个节点的子节点, 从左到右.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub(crate) fn add_node(&mut self, token: Token<'a>) -> NodeId {
        self.nodes.push(Node {
            token,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    /// 匹配成功时把输入终结符 (带位置信息) 写回到对应的节点上.
    pub(crate) fn set_symbol(&mut self, id: NodeId, token: Token<'a>) {
        self.nodes[id.0].token = token;
    }

    fn fmt_node(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        if node.token.is_term() {
            return node.token.to_string();
        }
        let children: Vec<String> = node.children.iter().map(|c| self.fmt_node(*c)).collect();
        format!("{} -> [{}]", node.token, children.join(", "))
    }

    /// 序列化成通用的树交换文档, 每个节点携带一个名为 `name` 的属性存放符号文本.
    /// 子节点在文档中保持从左到右的顺序.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<tree>");
        out += r#"<declarations><attributeDecl name="name" type="String"/></declarations>"#;
        self.xml_node(self.root(), &mut out);
        out += "</tree>";
        out
    }

    fn xml_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        *out += &format!(
            r#"<branch><attribute name="name" value="{}"/>"#,
            xml_escape(node.token.as_str())
        );
        for child in &node.children {
            self.xml_node(*child, out);
        }
        *out += "</branch>";
    }
}

impl Display for ParseTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.fmt_node(self.root()))
    }
}

fn xml_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            c => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{NonTerminal, Terminal};
    use pretty_assertions::assert_eq;

    fn sample_tree() -> ParseTree<'static> {
        // S -> ( S ) 且内层 S -> a
        let mut tree = ParseTree::new(NonTerminal::from("S").into());
        let open = tree.add_node(Terminal::from("(").into());
        let inner = tree.add_node(NonTerminal::from("S").into());
        let close = tree.add_node(Terminal::from(")").into());
        tree.add_child(tree.root(), open);
        tree.add_child(tree.root(), inner);
        tree.add_child(tree.root(), close);
        let a = tree.add_node(Terminal::from("a").into());
        tree.add_child(inner, a);
        tree
    }

    #[test]
    fn display_lists_children_in_order() {
        assert_eq!(sample_tree().to_string(), "S -> [(, S -> [a], )]");
    }

    #[test]
    fn xml_document_nests_branches() {
        assert_eq!(
            sample_tree().to_xml(),
            r#"<tree><declarations><attributeDecl name="name" type="String"/></declarations><branch><attribute name="name" value="S"/><branch><attribute name="name" value="("/></branch><branch><attribute name="name" value="S"/><branch><attribute name="name" value="a"/></branch></branch><branch><attribute name="name" value=")"/></branch></branch></tree>"#
        );
    }

    #[test]
    fn xml_escapes_operator_spellings() {
        let tree = ParseTree::new(Terminal::from("<=").into());
        assert!(tree.to_xml().contains(r#"value="&lt;=""#));
    }
}
