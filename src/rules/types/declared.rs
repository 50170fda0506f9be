//! Resolución de tipos a partir de las declaraciones del propio archivo.
//!
//! Se construye una vez por archivo: clases, interfaces, alias de tipo e
//! imports renombrados se indexan con una consulta de tree-sitter; el resto
//! (campos, parámetros, variables locales) se resuelve bajo demanda
//! recorriendo el árbol. Lo que no aparece declarado cae al preludio de
//! RxJS/Angular y, si tampoco está ahí, queda como `Unknown`.

use anyhow::Context;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator};

use super::{StaticType, TypeResolver, TypeUniverse, prelude};
use crate::rules::query::{self, SyntaxKind};
use crate::rules::source::SourceFile;

/// Límite de anidamiento al seguir alias, inicializadores y herencia.
const MAX_DEPTH: usize = 32;

const DECLARATIONS_QUERY: &str = r#"
    (class_declaration name: (type_identifier) @name) @type
    (abstract_class_declaration name: (type_identifier) @name) @type
    (interface_declaration name: (type_identifier) @name) @type
    (type_alias_declaration name: (type_identifier) @name value: (_) @alias)
    (import_specifier name: (identifier) @imported alias: (identifier) @local)
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberUse {
    Property,
    Call,
}

#[derive(Debug, Clone, Copy)]
enum Binding<'t> {
    /// Declarado con anotación de tipo.
    Typed(Node<'t>),
    /// Sin anotación pero con inicializador.
    Value(Node<'t>),
    Function(Node<'t>),
    Untyped,
}

pub struct DeclaredTypes<'f> {
    file: &'f SourceFile,
    /// Clases e interfaces por nombre local (las interfaces pueden fusionarse).
    types: HashMap<String, Vec<Node<'f>>>,
    aliases: HashMap<String, Node<'f>>,
    /// Nombre local -> nombre importado (`import { Observable as Obs }`).
    imports: HashMap<String, String>,
    /// Alias ya resueltos. El cuerpo de un alias no depende de sus argumentos.
    alias_cache: RefCell<HashMap<String, StaticType>>,
    /// Alias en expansión; una referencia a uno de ellos es recursiva.
    expanding: RefCell<HashSet<String>>,
}

impl<'f> DeclaredTypes<'f> {
    pub fn build(file: &'f SourceFile) -> anyhow::Result<Self> {
        let query = Query::new(file.language(), DECLARATIONS_QUERY)
            .context("Consulta de declaraciones inválida")?;
        let capture_names = query.capture_names();

        let mut types: HashMap<String, Vec<Node<'f>>> = HashMap::new();
        let mut aliases = HashMap::new();
        let mut imports = HashMap::new();

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, file.root(), file.text().as_bytes());

        while let Some(m) = matches.next() {
            let mut captured: HashMap<&str, Node<'f>> = HashMap::new();
            for capture in m.captures {
                captured.insert(capture_names[capture.index as usize], capture.node);
            }

            if let (Some(name), Some(decl)) = (captured.get("name"), captured.get("type")) {
                types
                    .entry(file.node_text(*name).to_string())
                    .or_default()
                    .push(*decl);
            } else if let (Some(name), Some(value)) = (captured.get("name"), captured.get("alias")) {
                aliases.insert(file.node_text(*name).to_string(), *value);
            } else if let (Some(imported), Some(local)) =
                (captured.get("imported"), captured.get("local"))
            {
                imports.insert(
                    file.node_text(*local).to_string(),
                    file.node_text(*imported).to_string(),
                );
            }
        }

        Ok(Self {
            file,
            types,
            aliases,
            imports,
            alias_cache: RefCell::default(),
            expanding: RefCell::default(),
        })
    }

    /// Nombre nominal canónico: las declaraciones locales ganan a los imports renombrados.
    fn canonical(&self, name: &str) -> String {
        if self.types.contains_key(name) {
            return name.to_string();
        }
        self.imports
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    fn text(&self, node: Node<'_>) -> &'f str {
        // Los nodos siempre pertenecen al árbol de `self.file`.
        let bytes = self.file.text().as_bytes();
        node.utf8_text(bytes).unwrap_or("")
    }

    // ------------------------------------------------------------------
    // Tipos declarados (anotaciones)
    // ------------------------------------------------------------------

    fn lower_type(&self, node: Node<'_>, depth: usize) -> StaticType {
        if depth > MAX_DEPTH {
            return StaticType::Unknown;
        }

        match node.kind() {
            "type_annotation"
            | "opting_type_annotation"
            | "omitting_type_annotation"
            | "parenthesized_type"
            | "readonly_type" => query::named_children(node)
                .into_iter()
                .next()
                .map(|inner| self.lower_type(inner, depth + 1))
                .unwrap_or(StaticType::Unknown),
            "type_identifier" => self.lower_named(self.text(node), depth),
            "nested_type_identifier" => node
                .child_by_field_name("name")
                .map(|name| StaticType::nominal(self.text(name)))
                .unwrap_or(StaticType::Unknown),
            "generic_type" => {
                let Some(name) = node.child_by_field_name("name") else {
                    return StaticType::Unknown;
                };
                let target = self.lower_type(name, depth + 1);
                if target.is_unknown() {
                    return StaticType::Unknown;
                }
                let arguments = node
                    .child_by_field_name("type_arguments")
                    .map(|args| self.lower_type_arguments(args, depth + 1))
                    .unwrap_or_default();
                match target {
                    // alias genérico: `type Src<T> = Observable<T>`
                    StaticType::Generic { target, .. } => StaticType::Generic { target, arguments },
                    target => StaticType::generic(target, arguments),
                }
            }
            "union_type" => StaticType::union_of(
                query::named_children(node)
                    .into_iter()
                    .map(|member| self.lower_type(member, depth + 1)),
            ),
            "array_type" => {
                let element = query::named_children(node)
                    .into_iter()
                    .next()
                    .map(|inner| self.lower_type(inner, depth + 1))
                    .unwrap_or(StaticType::Unknown);
                StaticType::generic(StaticType::nominal("Array"), vec![element])
            }
            "predefined_type" | "literal_type" => StaticType::Primitive(self.text(node).to_string()),
            _ => StaticType::Unknown,
        }
    }

    fn lower_named(&self, name: &str, depth: usize) -> StaticType {
        if self.types.contains_key(name) {
            return StaticType::nominal(name);
        }
        let Some(alias) = self.aliases.get(name) else {
            return StaticType::nominal(self.canonical(name));
        };

        if let Some(cached) = self.alias_cache.borrow().get(name) {
            return cached.clone();
        }
        // `type Expr = Expr[] | ...`: la referencia interna no aporta símbolo
        if !self.expanding.borrow_mut().insert(name.to_string()) {
            return StaticType::Unknown;
        }
        let lowered = self.lower_type(*alias, depth + 1);
        self.expanding.borrow_mut().remove(name);
        self.alias_cache
            .borrow_mut()
            .insert(name.to_string(), lowered.clone());
        lowered
    }

    fn lower_type_arguments(&self, args: Node<'_>, depth: usize) -> Vec<StaticType> {
        query::named_children(args)
            .into_iter()
            .map(|arg| self.lower_type(arg, depth))
            .collect()
    }

    /// Tipo de la expresión de un `extends` de clase: `Subject<T>`, `rx.Observable`.
    fn heritage_type(&self, expr: Node<'_>) -> StaticType {
        match SyntaxKind::of(expr) {
            SyntaxKind::Identifier => self.lower_named(self.text(expr), 0),
            SyntaxKind::MemberExpression => query::member_property(expr)
                .map(|p| StaticType::nominal(self.text(p)))
                .unwrap_or(StaticType::Unknown),
            _ => StaticType::Unknown,
        }
    }

    /// Tipos base declarados por una clase o interfaz (no incluye `implements`).
    fn declared_bases(&self, decl: Node<'_>) -> Vec<StaticType> {
        let mut bases = Vec::new();
        for child in query::named_children(decl) {
            match child.kind() {
                "class_heritage" => {
                    for clause in query::named_children(child) {
                        if clause.kind() != "extends_clause" {
                            continue;
                        }
                        for part in query::named_children(clause) {
                            if part.kind() == "type_arguments" {
                                if let Some(last) = bases.pop() {
                                    let arguments = self.lower_type_arguments(part, 1);
                                    bases.push(StaticType::generic(last, arguments));
                                }
                            } else {
                                bases.push(self.heritage_type(part));
                            }
                        }
                    }
                }
                "extends_type_clause" => bases.extend(
                    query::named_children(child)
                        .into_iter()
                        .map(|ty| self.lower_type(ty, 1)),
                ),
                _ => {}
            }
        }
        bases
    }

    // ------------------------------------------------------------------
    // Miembros
    // ------------------------------------------------------------------

    /// Busca el miembro `name` en el cuerpo de una clase o interfaz,
    /// incluidas las propiedades de parámetro del constructor.
    fn find_member<'t>(&self, decl: Node<'t>, name: &str) -> Option<Node<'t>> {
        for member in query::class_members(decl) {
            if query::member_name(member).is_some_and(|n| self.text(n) == name) {
                return Some(member);
            }
            let is_constructor = SyntaxKind::of(member) == SyntaxKind::MethodDefinition
                && query::member_name(member).is_some_and(|n| self.text(n) == "constructor");
            if is_constructor {
                if let Some(param) = self.parameter_property(member, name) {
                    return Some(param);
                }
            }
        }
        None
    }

    fn parameter_property<'t>(&self, constructor: Node<'t>, name: &str) -> Option<Node<'t>> {
        let params = constructor.child_by_field_name("parameters")?;
        query::named_children(params).into_iter().find(|param| {
            let is_property = query::has_token(*param, "readonly")
                || query::named_children(*param)
                    .iter()
                    .any(|c| c.kind() == "accessibility_modifier");
            is_property
                && param
                    .child_by_field_name("pattern")
                    .is_some_and(|p| self.text(p) == name)
        })
    }

    fn member_type<'t>(&self, member: Node<'t>, usage: MemberUse, depth: usize) -> StaticType {
        match (member.kind(), usage) {
            ("public_field_definition" | "field_definition" | "property_signature", MemberUse::Property) => {
                if let Some(annotation) = member.child_by_field_name("type") {
                    self.lower_type(annotation, depth + 1)
                } else if let Some(value) = member.child_by_field_name("value") {
                    self.expr_type(value, depth + 1)
                } else {
                    StaticType::Unknown
                }
            }
            ("public_field_definition" | "field_definition" | "property_signature", MemberUse::Call) => member
                .child_by_field_name("type")
                .or_else(|| member.child_by_field_name("value"))
                .map(|callable| self.return_type_of(callable, depth + 1))
                .unwrap_or(StaticType::Unknown),
            ("method_definition", MemberUse::Property) if query::has_token(member, "get") => {
                self.return_type_of(member, depth + 1)
            }
            (
                "method_definition" | "method_signature" | "abstract_method_signature",
                MemberUse::Call,
            ) => self.return_type_of(member, depth + 1),
            ("required_parameter" | "optional_parameter", MemberUse::Property) => member
                .child_by_field_name("type")
                .map(|ty| self.lower_type(ty, depth + 1))
                .unwrap_or(StaticType::Unknown),
            ("required_parameter" | "optional_parameter", MemberUse::Call) => member
                .child_by_field_name("type")
                .map(|ty| self.return_type_of(ty, depth + 1))
                .unwrap_or(StaticType::Unknown),
            _ => StaticType::Unknown,
        }
    }

    /// Tipo de retorno declarado de algo invocable.
    fn return_type_of(&self, callable: Node<'_>, depth: usize) -> StaticType {
        if depth > MAX_DEPTH {
            return StaticType::Unknown;
        }
        if callable.kind() == "type_annotation" {
            return query::named_children(callable)
                .into_iter()
                .next()
                .map(|inner| self.return_type_of(inner, depth + 1))
                .unwrap_or(StaticType::Unknown);
        }
        match callable.kind() {
            "function_declaration"
            | "function_expression"
            | "function"
            | "generator_function_declaration"
            | "arrow_function"
            | "method_definition"
            | "method_signature"
            | "abstract_method_signature"
            | "function_type" => callable
                .child_by_field_name("return_type")
                .map(|ty| self.lower_type(ty, depth + 1))
                .unwrap_or(StaticType::Unknown),
            _ => StaticType::Unknown,
        }
    }

    /// Miembro `name` de una declaración concreta, siguiendo sus tipos base.
    fn member_in_declaration<'t>(
        &self,
        decl: Node<'t>,
        name: &str,
        usage: MemberUse,
        depth: usize,
    ) -> StaticType {
        if let Some(member) = self.find_member(decl, name) {
            return self.member_type(member, usage, depth);
        }
        self.declared_bases(decl)
            .iter()
            .map(|base| self.lookup_member(base, name, usage, depth + 1))
            .find(|ty| !ty.is_unknown())
            .unwrap_or(StaticType::Unknown)
    }

    fn lookup_member(&self, ty: &StaticType, name: &str, usage: MemberUse, depth: usize) -> StaticType {
        if depth > MAX_DEPTH {
            return StaticType::Unknown;
        }

        match ty {
            StaticType::Generic { target, .. } => self.lookup_member(target, name, usage, depth + 1),
            StaticType::Union(members) => StaticType::union_of(
                members
                    .iter()
                    .map(|member| self.lookup_member(member, name, usage, depth + 1)),
            ),
            StaticType::Nominal(type_name) => match self.types.get(type_name) {
                Some(decls) => decls
                    .iter()
                    .map(|decl| self.member_in_declaration(*decl, name, usage, depth + 1))
                    .find(|ty| !ty.is_unknown())
                    .unwrap_or(StaticType::Unknown),
                None => {
                    let own = match usage {
                        MemberUse::Property => prelude::prelude_property(type_name, name),
                        MemberUse::Call => prelude::prelude_method(type_name, name),
                    };
                    own.unwrap_or_else(|| {
                        prelude::prelude_bases(type_name)
                            .iter()
                            .map(|base| self.lookup_member(base, name, usage, depth + 1))
                            .find(|ty| !ty.is_unknown())
                            .unwrap_or(StaticType::Unknown)
                    })
                }
            },
            _ => StaticType::Unknown,
        }
    }

    /// Clase cuyo `this` ve `node`. Las funciones clásicas redefinen `this`;
    /// las arrow functions no.
    fn enclosing_class<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let mut current = node.parent();
        while let Some(parent) = current {
            if SyntaxKind::of(parent).is_class() {
                return Some(parent);
            }
            if matches!(
                parent.kind(),
                "function_declaration"
                    | "function_expression"
                    | "function"
                    | "generator_function_declaration"
                    | "generator_function"
            ) {
                return None;
            }
            current = parent.parent();
        }
        None
    }

    // ------------------------------------------------------------------
    // Ámbitos locales
    // ------------------------------------------------------------------

    fn find_binding<'t>(&self, node: Node<'t>, name: &str) -> Option<Binding<'t>> {
        let mut current = node.parent();
        while let Some(scope) = current {
            let binding = match scope.kind() {
                "function_declaration"
                | "function_expression"
                | "function"
                | "generator_function_declaration"
                | "generator_function"
                | "method_definition"
                | "arrow_function" => self.parameter_binding(scope, name),
                "statement_block" | "program" | "class_static_block" => self.block_binding(scope, name),
                "for_statement" => scope
                    .child_by_field_name("initializer")
                    .and_then(|init| self.declaration_binding(init, name)),
                "for_in_statement" => scope
                    .child_by_field_name("left")
                    .filter(|left| self.text(*left) == name)
                    .map(|_| Binding::Untyped),
                "catch_clause" => scope
                    .child_by_field_name("parameter")
                    .filter(|param| self.text(*param) == name)
                    .map(|_| Binding::Untyped),
                _ => None,
            };
            if binding.is_some() {
                return binding;
            }
            current = scope.parent();
        }
        None
    }

    fn parameter_binding<'t>(&self, function: Node<'t>, name: &str) -> Option<Binding<'t>> {
        if let Some(single) = function.child_by_field_name("parameter") {
            return (self.text(single) == name).then_some(Binding::Untyped);
        }
        let params = function.child_by_field_name("parameters")?;
        let param = query::named_children(params).into_iter().find(|param| {
            param
                .child_by_field_name("pattern")
                .is_some_and(|p| p.kind() == "identifier" && self.text(p) == name)
        })?;

        Some(
            match (param.child_by_field_name("type"), param.child_by_field_name("value")) {
                (Some(ty), _) => Binding::Typed(ty),
                (None, Some(value)) => Binding::Value(value),
                (None, None) => Binding::Untyped,
            },
        )
    }

    fn block_binding<'t>(&self, block: Node<'t>, name: &str) -> Option<Binding<'t>> {
        for statement in query::named_children(block) {
            let declaration = if statement.kind() == "export_statement" {
                match statement.child_by_field_name("declaration") {
                    Some(decl) => decl,
                    None => continue,
                }
            } else {
                statement
            };

            match declaration.kind() {
                "lexical_declaration" | "variable_declaration" => {
                    if let Some(binding) = self.declaration_binding(declaration, name) {
                        return Some(binding);
                    }
                }
                "function_declaration" | "generator_function_declaration" => {
                    let named = declaration
                        .child_by_field_name("name")
                        .is_some_and(|n| self.text(n) == name);
                    if named {
                        return Some(Binding::Function(declaration));
                    }
                }
                "class_declaration" | "abstract_class_declaration" | "enum_declaration" => {
                    let named = declaration
                        .child_by_field_name("name")
                        .is_some_and(|n| self.text(n) == name);
                    if named {
                        return Some(Binding::Untyped);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn declaration_binding<'t>(&self, declaration: Node<'t>, name: &str) -> Option<Binding<'t>> {
        if !matches!(declaration.kind(), "lexical_declaration" | "variable_declaration") {
            return None;
        }
        let declarator = query::named_children(declaration).into_iter().find(|d| {
            d.kind() == "variable_declarator"
                && d.child_by_field_name("name")
                    .is_some_and(|n| n.kind() == "identifier" && self.text(n) == name)
        })?;

        Some(
            match (
                declarator.child_by_field_name("type"),
                declarator.child_by_field_name("value"),
            ) {
                (Some(ty), _) => Binding::Typed(ty),
                (None, Some(value)) => Binding::Value(value),
                (None, None) => Binding::Untyped,
            },
        )
    }

    // ------------------------------------------------------------------
    // Expresiones
    // ------------------------------------------------------------------

    fn expr_type<'t>(&self, node: Node<'t>, depth: usize) -> StaticType {
        if depth > MAX_DEPTH {
            return StaticType::Unknown;
        }

        match node.kind() {
            "parenthesized_expression" | "non_null_expression" => query::named_children(node)
                .into_iter()
                .next()
                .map(|inner| self.expr_type(inner, depth + 1))
                .unwrap_or(StaticType::Unknown),
            "as_expression" | "satisfies_expression" => match query::named_children(node).as_slice() {
                [_, ty] => self.lower_type(*ty, depth + 1),
                // `x as const`
                [expr] => self.expr_type(*expr, depth + 1),
                _ => StaticType::Unknown,
            },
            "type_assertion" => query::named_children(node)
                .into_iter()
                .find(|c| c.kind() == "type_arguments")
                .and_then(|args| query::named_children(args).into_iter().next())
                .map(|ty| self.lower_type(ty, depth + 1))
                .unwrap_or(StaticType::Unknown),
            "ternary_expression" => StaticType::union_of(
                ["consequence", "alternative"]
                    .iter()
                    .filter_map(|field| node.child_by_field_name(*field))
                    .map(|branch| self.expr_type(branch, depth + 1)),
            ),
            "assignment_expression" => node
                .child_by_field_name("right")
                .map(|right| self.expr_type(right, depth + 1))
                .unwrap_or(StaticType::Unknown),
            "this" => self
                .enclosing_class(node)
                .and_then(|class| class.child_by_field_name("name"))
                .map(|name| StaticType::nominal(self.canonical(self.text(name))))
                .unwrap_or(StaticType::Unknown),
            "identifier" => self.identifier_type(node, depth),
            "member_expression" => self.member_access_type(node, depth),
            "call_expression" => self.call_type(node, depth),
            "new_expression" => self.new_type(node, depth),
            _ => StaticType::Unknown,
        }
    }

    fn identifier_type<'t>(&self, node: Node<'t>, depth: usize) -> StaticType {
        let name = self.text(node);
        match self.find_binding(node, name) {
            Some(Binding::Typed(ty)) => self.lower_type(ty, depth + 1),
            Some(Binding::Value(value)) => self.expr_type(value, depth + 1),
            Some(Binding::Function(_)) | Some(Binding::Untyped) => StaticType::Unknown,
            None => prelude::prelude_constant(name).unwrap_or(StaticType::Unknown),
        }
    }

    fn member_access_type<'t>(&self, node: Node<'t>, depth: usize) -> StaticType {
        let (Some(object), Some(property)) = (
            node.child_by_field_name("object"),
            query::member_property(node),
        ) else {
            return StaticType::Unknown;
        };
        let name = self.text(property);
        self.member_of(object, name, MemberUse::Property, depth)
    }

    /// `object.name` con `object` posiblemente `this`.
    fn member_of<'t>(&self, object: Node<'t>, name: &str, usage: MemberUse, depth: usize) -> StaticType {
        if object.kind() == "this" {
            return self
                .enclosing_class(object)
                .map(|class| self.member_in_declaration(class, name, usage, depth + 1))
                .unwrap_or(StaticType::Unknown);
        }
        let receiver = self.expr_type(object, depth + 1);
        self.lookup_member(&receiver, name, usage, depth + 1)
    }

    fn call_type<'t>(&self, node: Node<'t>, depth: usize) -> StaticType {
        let Some(callee) = node.child_by_field_name("function") else {
            return StaticType::Unknown;
        };

        match SyntaxKind::of(callee) {
            SyntaxKind::MemberExpression => {
                let (Some(object), Some(property)) = (
                    callee.child_by_field_name("object"),
                    query::member_property(callee),
                ) else {
                    return StaticType::Unknown;
                };
                self.member_of(object, self.text(property), MemberUse::Call, depth)
            }
            SyntaxKind::Identifier => {
                let name = self.text(callee);
                match self.find_binding(callee, name) {
                    Some(Binding::Function(function)) => self.return_type_of(function, depth + 1),
                    Some(Binding::Value(value)) => self.return_type_of(value, depth + 1),
                    Some(Binding::Typed(ty)) => self.return_type_of(ty, depth + 1),
                    Some(Binding::Untyped) => StaticType::Unknown,
                    None => prelude::prelude_function(name).unwrap_or(StaticType::Unknown),
                }
            }
            _ => StaticType::Unknown,
        }
    }

    fn new_type<'t>(&self, node: Node<'t>, depth: usize) -> StaticType {
        let Some(constructor) = node.child_by_field_name("constructor") else {
            return StaticType::Unknown;
        };
        let target = match SyntaxKind::of(constructor) {
            SyntaxKind::Identifier => StaticType::nominal(self.canonical(self.text(constructor))),
            SyntaxKind::MemberExpression => match query::member_property(constructor) {
                Some(property) => StaticType::nominal(self.text(property)),
                None => return StaticType::Unknown,
            },
            _ => return StaticType::Unknown,
        };
        match node.child_by_field_name("type_arguments") {
            Some(args) => StaticType::generic(target, self.lower_type_arguments(args, depth + 1)),
            None => target,
        }
    }
}

impl TypeUniverse for DeclaredTypes<'_> {
    fn base_types(&self, name: &str) -> Vec<StaticType> {
        match self.types.get(name) {
            Some(decls) => decls.iter().flat_map(|decl| self.declared_bases(*decl)).collect(),
            None => prelude::prelude_bases(name),
        }
    }
}

impl TypeResolver for DeclaredTypes<'_> {
    fn type_of(&self, node: Node<'_>) -> StaticType {
        self.expr_type(node, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::types::{NamePattern, could_be_type};

    fn parse(src: &str) -> SourceFile {
        SourceFile::parse("types.component.ts", src).unwrap()
    }

    /// Tipo del receptor del primer `.subscribe()` del archivo.
    fn receiver_type(file: &SourceFile) -> StaticType {
        let types = DeclaredTypes::build(file).unwrap();
        let call = query::find_all(
            file.root(),
            |n| query::member_call(file, n, "subscribe").is_some(),
            |_| false,
        )[0];
        let callee = query::member_call(file, call, "subscribe").unwrap();
        types.type_of(callee.child_by_field_name("object").unwrap())
    }

    fn is_stream(file: &SourceFile) -> bool {
        let types = DeclaredTypes::build(file).unwrap();
        could_be_type(&types, &receiver_type(file), &NamePattern::exact("Observable"))
    }

    #[test]
    fn test_field_annotation() {
        let file = parse("class A { s: Observable<number>; f() { this.s.subscribe(); } }");
        assert_eq!(
            receiver_type(&file),
            StaticType::generic(
                StaticType::nominal("Observable"),
                vec![StaticType::Primitive("number".into())]
            )
        );
    }

    #[test]
    fn test_field_initializer_new_subject() {
        let file = parse("class A { s = new Subject<void>(); f() { this.s.subscribe(); } }");
        assert!(is_stream(&file));
    }

    #[test]
    fn test_pipe_on_local_parameter() {
        let file = parse(
            "class A { f(source: Observable<string>) { source.pipe(map(x => x)).subscribe(); } }",
        );
        assert_eq!(receiver_type(&file), StaticType::nominal("Observable"));
    }

    #[test]
    fn test_constructor_parameter_property() {
        let file = parse(
            "class A { constructor(private route: ActivatedRoute) {} f() { this.route.params.subscribe(); } }",
        );
        assert!(is_stream(&file));
    }

    #[test]
    fn test_local_variable_and_creation_function() {
        let file = parse("function f() { const values$ = of(1, 2); values$.subscribe(); }");
        assert!(is_stream(&file));
    }

    #[test]
    fn test_shadowed_creation_function_is_not_stream() {
        let file = parse("function of(x: number): Promise<number> { return null; }\nof(1).subscribe();");
        assert!(!is_stream(&file));
    }

    #[test]
    fn test_local_class_inheriting_observable() {
        let file = parse(
            "class Store2<T> extends BehaviorSubject<T> {}\nclass A { s: Store2<number>; f() { this.s.subscribe(); } }",
        );
        assert!(is_stream(&file));
    }

    #[test]
    fn test_union_annotation_and_alias() {
        let file = parse(
            "type Maybe<T> = Observable<T> | null;\nclass A { s: Maybe<number>; f() { this.s.subscribe(); } }",
        );
        let ty = receiver_type(&file);
        assert!(ty.is_generic_instantiation());
        assert!(is_stream(&file));
    }

    #[test]
    fn test_renamed_import() {
        let file = parse(
            "import { Observable as Obs } from 'rxjs';\nclass A { s: Obs<number>; f() { this.s.subscribe(); } }",
        );
        assert!(is_stream(&file));
    }

    #[test]
    fn test_method_return_type() {
        let file = parse(
            "class A { load(): Observable<number> { return null; } f() { this.load().subscribe(); } }",
        );
        assert!(is_stream(&file));
    }

    #[test]
    fn test_interface_member_and_extension() {
        let file = parse(
            "interface Events extends Observable<string> {}\ninterface Bus { events: Events }\nclass A { bus: Bus; f() { this.bus.events.subscribe(); } }",
        );
        assert!(is_stream(&file));
    }

    #[test]
    fn test_unknown_receiver_is_not_stream() {
        let file = parse("class A { f(x: any) { x.subscribe(); } }");
        assert!(!is_stream(&file));
        let file = parse("class A { f() { whatever.subscribe(); } }");
        assert_eq!(receiver_type(&file), StaticType::Unknown);
    }

    #[test]
    fn test_cyclic_classes_terminate() {
        let file = parse("class A extends B {}\nclass B extends A {}\nlet a: A;\na.subscribe();");
        assert!(!is_stream(&file));
    }

    #[test]
    fn test_recursive_alias_resolves_once() {
        let file = parse(
            "type Q<A, B, C, D> = { a: A };\n\
             type Expr = Q<Expr, Expr, Expr, Expr> | Q<Expr, Expr, Expr, Expr> | Expr[];\n\
             class Holder { s: Expr; f() { this.s.subscribe(); } }",
        );
        let started = std::time::Instant::now();
        assert!(!is_stream(&file));
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_recursive_alias_keeps_stream_member() {
        let file = parse(
            "type Source = Observable<number> | Source[];\nclass A { s: Source; f() { this.s.subscribe(); } }",
        );
        assert!(is_stream(&file));
    }

    #[test]
    fn test_mutually_recursive_aliases() {
        let file = parse(
            "type Left = Right | Subject<void>;\ntype Right = Left[];\nclass A { s: Right | Left; f() { this.s.subscribe(); } }",
        );
        assert!(is_stream(&file));
    }

    #[test]
    fn test_as_expression_and_non_null() {
        let file = parse("let x: any;\n(x as Subject<number>)!.subscribe();");
        assert!(is_stream(&file));
    }

    #[test]
    fn test_http_client_call() {
        let file = parse(
            "class A { constructor(private readonly http: HttpClient) {} f() { this.http.get('/x').subscribe(); } }",
        );
        assert!(is_stream(&file));
    }
}
