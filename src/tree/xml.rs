//! XML serialization of [`ConfigTree`]s.
//!
//! Documents carrying a document type declaration are rejected outright: a
//! DTD is the only way to smuggle external or recursive entities into a
//! settings file, and no legitimate settings file declares one.

use std::path::Path;

use roxmltree::{Document, Node, ParsingOptions};

use super::{ConfigTree, ConfigValue};
use crate::error::{Result, WorkflowalizerError};

/// Parses `text` with DTDs forbidden, mapping failures onto `file`.
pub(crate) fn parse_document<'a>(text: &'a str, file: &Path) -> Result<Document<'a>> {
    let options = ParsingOptions {
        allow_dtd: false,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options).map_err(|e| match e {
        roxmltree::Error::DtdDetected => WorkflowalizerError::UnsafeXml(file.to_path_buf()),
        other => WorkflowalizerError::MalformedXml {
            file: file.to_path_buf(),
            message: other.to_string(),
        },
    })
}

/// Reads a whole file into memory, distinguishing a missing file from other I/O failures.
pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WorkflowalizerError::MissingFile(path.to_path_buf()),
        _ => WorkflowalizerError::io(path, e),
    })
}

/// Loads the settings tree stored at `path`.
pub fn load_tree(path: &Path) -> Result<ConfigTree> {
    tracing::debug!("Reading settings tree '{}'", path.display());
    let text = read_file(path)?;
    parse_tree(&text, path)
}

/// Parses a settings tree from its XML text. `file` is only used for error reporting.
pub fn parse_tree(text: &str, file: &Path) -> Result<ConfigTree> {
    let document = parse_document(text, file)?;
    let root = document.root_element();
    if root.tag_name().name() != "config" {
        return Err(malformed(
            file,
            format!("root element is <{}>, expected <config>", root.tag_name().name()),
        ));
    }
    read_config(root, file)
}

fn read_config(node: Node<'_, '_>, file: &Path) -> Result<ConfigTree> {
    let mut tree = ConfigTree::new(node.attribute("key").unwrap_or_default());
    for child in node.children().filter(Node::is_element) {
        let key = child
            .attribute("key")
            .ok_or_else(|| malformed(file, format!("<{}> without key attribute", child.tag_name().name())))?;
        let value = match child.tag_name().name() {
            "config" => ConfigValue::Config(read_config(child, file)?),
            "entry" => read_entry(child, key, file)?,
            other => return Err(malformed(file, format!("unexpected element <{other}>"))),
        };
        tree.insert(key, value);
    }
    Ok(tree)
}

fn read_entry(node: Node<'_, '_>, key: &str, file: &Path) -> Result<ConfigValue> {
    let entry_type = node
        .attribute("type")
        .ok_or_else(|| malformed(file, format!("entry '{key}' without type attribute")))?;
    let is_null = node.attribute("isnull") == Some("true");
    let raw = node.attribute("value").unwrap_or_default();

    let invalid = |what: &str| malformed(file, format!("entry '{key}' has invalid {what} value '{raw}'"));

    let value = match entry_type {
        "xstring" | "xpassword" | "xtransientstring" => {
            ConfigValue::String((!is_null).then(|| raw.to_string()))
        }
        "xboolean" => ConfigValue::Bool(raw.parse().map_err(|_| invalid("boolean"))?),
        "xbyte" => ConfigValue::Byte(raw.parse().map_err(|_| invalid("byte"))?),
        "xshort" => ConfigValue::Short(raw.parse().map_err(|_| invalid("short"))?),
        "xint" => ConfigValue::Int(raw.parse().map_err(|_| invalid("int"))?),
        "xlong" => ConfigValue::Long(raw.parse().map_err(|_| invalid("long"))?),
        "xfloat" => ConfigValue::Float(raw.parse().map_err(|_| invalid("float"))?),
        "xdouble" => ConfigValue::Double(raw.parse().map_err(|_| invalid("double"))?),
        "xchar" => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => ConfigValue::Char(c),
                _ => return Err(invalid("char")),
            }
        }
        other => return Err(malformed(file, format!("entry '{key}' has unknown type '{other}'"))),
    };
    Ok(value)
}

fn malformed(file: &Path, message: String) -> WorkflowalizerError {
    WorkflowalizerError::MalformedXml {
        file: file.to_path_buf(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const SETTINGS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<config xmlns="http://www.knime.org/2008/09/XMLConfig" key="settings.xml">
    <entry key="factory" type="xstring" value="org.example.ReaderFactory"/>
    <entry key="customDescription" type="xstring" isnull="true" value=""/>
    <entry key="state" type="xint" value="2"/>
    <entry key="separator" type="xchar" value=";"/>
    <config key="model">
        <entry key="skip" type="xboolean" value="true"/>
        <entry key="ratio" type="xdouble" value="0.25"/>
    </config>
</config>"#;

    #[test]
    fn parses_entries_and_nested_configs() {
        let tree = parse_tree(SETTINGS, Path::new("settings.xml")).unwrap();
        assert_eq!(tree.key(), "settings.xml");
        assert_eq!(tree.get_string("factory").unwrap(), "org.example.ReaderFactory");
        assert_eq!(tree.get_nullable_string("customDescription").unwrap(), None);
        assert_eq!(tree.get_int("state").unwrap(), 2);
        assert_eq!(tree.get_char("separator").unwrap(), ';');
        let model = tree.get_config("model").unwrap();
        assert!(model.get_bool("skip").unwrap());
        assert_eq!(model.get_double("ratio").unwrap(), 0.25);
    }

    #[test]
    fn rejects_document_type_declarations() {
        let text = r#"<?xml version="1.0"?>
<!DOCTYPE config [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>
<config key="root"><entry key="a" type="xstring" value="&xxe;"/></config>"#;
        let err = parse_tree(text, Path::new("evil.xml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Security);
        assert!(err.to_string().contains("evil.xml"));
    }

    #[test]
    fn rejects_bad_values() {
        let text = r#"<config key="root"><entry key="n" type="xint" value="seven"/></config>"#;
        let err = parse_tree(text, Path::new("bad.xml")).unwrap_err();
        assert_eq!(err.code(), "W022");
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let err = load_tree(Path::new("/definitely/not/here/workflow.knime")).unwrap_err();
        assert_eq!(err.code(), "W020");
    }
}
