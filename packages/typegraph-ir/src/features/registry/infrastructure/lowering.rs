//! Per-file lowering
//!
//! Flattens one file's fragment tree into pre-order entries carrying
//! their identity key. Files are independent, so this runs on the rayon
//! pool; `collect` keeps input order.

use rayon::prelude::*;

use crate::errors::{Result, TypegraphError};
use crate::features::declaration::{
    AliasFragment, FileParseResult, FreeFunction, TypeFragment,
};

#[derive(Debug, Clone)]
pub(super) struct LoweredType {
    pub module_name: Option<String>,
    pub global_name: String,
    pub file: String,
    /// Position of the enclosing type in `LoweredFile::types`
    pub parent: Option<usize>,
    /// Fragment without `contained_types` / `typealiases` (lowered separately)
    pub fragment: TypeFragment,
}

#[derive(Debug, Clone)]
pub(super) struct LoweredAlias {
    pub module_name: Option<String>,
    pub global_name: String,
    pub file: String,
    pub parent: Option<usize>,
    pub fragment: AliasFragment,
}

#[derive(Debug, Clone, Default)]
pub(super) struct LoweredFile {
    pub module_name: Option<String>,
    pub types: Vec<LoweredType>,
    pub aliases: Vec<LoweredAlias>,
    pub functions: Vec<FreeFunction>,
}

pub(super) fn lower_files(files: &[FileParseResult]) -> Result<Vec<LoweredFile>> {
    files.par_iter().map(lower_file).collect()
}

fn lower_file(file: &FileParseResult) -> Result<LoweredFile> {
    let mut lowered = LoweredFile {
        module_name: file.module_name.clone(),
        ..Default::default()
    };

    for fragment in &file.types {
        let global_name = top_level_name(fragment, file.module_name.as_deref());
        lower_type(file, fragment, global_name, None, &mut lowered)?;
    }

    for alias in &file.typealiases {
        check_name(&file.file, &alias.name, "typealias")?;
        lowered.aliases.push(LoweredAlias {
            module_name: file.module_name.clone(),
            global_name: alias.name.clone(),
            file: file.file.clone(),
            parent: None,
            fragment: alias.clone(),
        });
    }

    lowered.functions = file
        .functions
        .iter()
        .map(|method| FreeFunction {
            module_name: file.module_name.clone(),
            file: file.file.clone(),
            method: method.clone(),
        })
        .collect();

    Ok(lowered)
}

fn lower_type(
    file: &FileParseResult,
    fragment: &TypeFragment,
    global_name: String,
    parent: Option<usize>,
    out: &mut LoweredFile,
) -> Result<()> {
    check_name(&file.file, &fragment.name, fragment.kind.tag().as_str())?;

    let mut flat = fragment.clone();
    flat.contained_types = Vec::new();
    flat.typealiases = Vec::new();

    let position = out.types.len();
    out.types.push(LoweredType {
        module_name: file.module_name.clone(),
        global_name: global_name.clone(),
        file: file.file.clone(),
        parent,
        fragment: flat,
    });

    for nested in &fragment.contained_types {
        let nested_name = format!("{}.{}", global_name, nested.name);
        lower_type(file, nested, nested_name, Some(position), out)?;
    }

    for alias in &fragment.typealiases {
        check_name(&file.file, &alias.name, "typealias")?;
        out.aliases.push(LoweredAlias {
            module_name: file.module_name.clone(),
            global_name: format!("{}.{}", global_name, alias.name),
            file: file.file.clone(),
            parent: Some(position),
            fragment: alias.clone(),
        });
    }

    Ok(())
}

/// `extension App.Foo` inside module `App` is the same identity as `Foo`
fn top_level_name(fragment: &TypeFragment, module_name: Option<&str>) -> String {
    if fragment.is_extension {
        if let (Some(module), Some((head, rest))) = (module_name, fragment.name.split_once('.')) {
            if head == module && !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    fragment.name.clone()
}

fn check_name(file: &str, name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TypegraphError::invalid_fragment(
            file,
            format!("{} with an empty name", what),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowering_is_pre_order_with_qualified_names() {
        let file = FileParseResult::new("Outer.swift").in_module("App").with_type(
            TypeFragment::struct_("Outer")
                .with_nested(TypeFragment::enum_("Inner").with_nested(TypeFragment::class("Leaf")))
                .with_nested(TypeFragment::struct_("Other")),
        );

        let lowered = lower_files(&[file]).unwrap();
        let names: Vec<&str> = lowered[0]
            .types
            .iter()
            .map(|t| t.global_name.as_str())
            .collect();
        assert_eq!(names, vec!["Outer", "Outer.Inner", "Outer.Inner.Leaf", "Outer.Other"]);
        let parents: Vec<Option<usize>> = lowered[0].types.iter().map(|t| t.parent).collect();
        assert_eq!(parents, vec![None, Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_own_module_prefix_is_stripped_from_extensions() {
        let file = FileParseResult::new("Ext.swift")
            .in_module("App")
            .with_type(TypeFragment::extension("App.Foo"))
            .with_type(TypeFragment::extension("Other.Foo"));

        let lowered = lower_files(&[file]).unwrap();
        assert_eq!(lowered[0].types[0].global_name, "Foo");
        assert_eq!(lowered[0].types[1].global_name, "Other.Foo");
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let file = FileParseResult::new("Bad.swift").with_type(TypeFragment::class(""));
        let err = lower_files(&[file]).unwrap_err();
        assert!(matches!(err, TypegraphError::InvalidFragment { .. }));
    }
}
