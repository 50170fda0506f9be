//! Consultas estructurales sobre el árbol de sintaxis.
//!
//! Cada nodo de tree-sitter se etiqueta con un [`SyntaxKind`] cerrado y los
//! patrones se expresan como predicados que se evalúan en un único recorrido
//! en preorden, así que los resultados salen siempre en orden de fuente.

use tree_sitter::Node;

use crate::rules::source::SourceFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Program,
    ExportStatement,
    ClassDeclaration,
    AbstractClassDeclaration,
    ClassExpression,
    ClassBody,
    InterfaceDeclaration,
    Decorator,
    MethodDefinition,
    MethodSignature,
    AbstractMethodSignature,
    FieldDefinition,
    PropertySignature,
    CallExpression,
    NewExpression,
    MemberExpression,
    Arguments,
    Identifier,
    PropertyIdentifier,
    PrivatePropertyIdentifier,
    This,
    Comment,
    Other,
}

impl SyntaxKind {
    pub fn of(node: Node<'_>) -> Self {
        match node.kind() {
            "program" => Self::Program,
            "export_statement" => Self::ExportStatement,
            "class_declaration" => Self::ClassDeclaration,
            "abstract_class_declaration" => Self::AbstractClassDeclaration,
            "class" => Self::ClassExpression,
            "class_body" => Self::ClassBody,
            "interface_declaration" => Self::InterfaceDeclaration,
            "decorator" => Self::Decorator,
            "method_definition" => Self::MethodDefinition,
            "method_signature" => Self::MethodSignature,
            "abstract_method_signature" => Self::AbstractMethodSignature,
            "public_field_definition" | "field_definition" => Self::FieldDefinition,
            "property_signature" => Self::PropertySignature,
            "call_expression" => Self::CallExpression,
            "new_expression" => Self::NewExpression,
            "member_expression" => Self::MemberExpression,
            "arguments" => Self::Arguments,
            "identifier" => Self::Identifier,
            "property_identifier" => Self::PropertyIdentifier,
            "private_property_identifier" => Self::PrivatePropertyIdentifier,
            "this" => Self::This,
            "comment" | "html_comment" => Self::Comment,
            _ => Self::Other,
        }
    }

    pub fn is_class(self) -> bool {
        matches!(
            self,
            Self::ClassDeclaration | Self::AbstractClassDeclaration | Self::ClassExpression
        )
    }
}

/// Recorre `root` en preorden y devuelve los nodos que cumplen `matches`.
///
/// Los descendientes de un nodo (distinto de `root`) para el que `prune`
/// devuelve `true` no se visitan; el nodo podado sí se evalúa.
pub fn find_all<'t>(
    root: Node<'t>,
    matches: impl Fn(Node<'t>) -> bool,
    prune: impl Fn(Node<'t>) -> bool,
) -> Vec<Node<'t>> {
    let mut found = Vec::new();
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        if matches(node) {
            found.push(node);
        }

        let descend = node.id() == root.id() || !prune(node);
        if descend && cursor.goto_first_child() {
            continue;
        }

        loop {
            if cursor.node().id() == root.id() {
                return found;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return found;
            }
        }
    }
}

/// Hijos con nombre que no son comentarios.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| SyntaxKind::of(*child) != SyntaxKind::Comment)
        .collect()
}

/// Argumentos reales de una llamada, en orden.
pub fn call_arguments(call: Node<'_>) -> Vec<Node<'_>> {
    match call.child_by_field_name("arguments") {
        Some(args) if SyntaxKind::of(args) == SyntaxKind::Arguments => named_children(args),
        _ => Vec::new(),
    }
}

/// Nombre de la propiedad accedida en `a.b` / `a?.b` / `a.#b`.
pub fn member_property<'t>(member: Node<'t>) -> Option<Node<'t>> {
    if SyntaxKind::of(member) != SyntaxKind::MemberExpression {
        return None;
    }
    member.child_by_field_name("property")
}

/// Para `recv.name(...)` devuelve el `member_expression` del callee si su
/// propiedad se llama `name`.
pub fn member_call<'t>(file: &SourceFile, call: Node<'t>, name: &str) -> Option<Node<'t>> {
    if SyntaxKind::of(call) != SyntaxKind::CallExpression {
        return None;
    }
    let callee = call.child_by_field_name("function")?;
    let property = member_property(callee)?;
    (file.node_text(property) == name).then_some(callee)
}

/// Nombre del callee cuando es un identificador simple: `takeUntil(...)`.
pub fn callee_identifier<'f>(file: &'f SourceFile, call: Node<'_>) -> Option<&'f str> {
    if SyntaxKind::of(call) != SyntaxKind::CallExpression {
        return None;
    }
    let callee = call.child_by_field_name("function")?;
    (SyntaxKind::of(callee) == SyntaxKind::Identifier).then(|| file.node_text(callee))
}

/// Decoradores aplicados a una clase. En `@X() export class A {}` el
/// decorador cuelga del `export_statement`, no de la clase.
pub fn class_decorators(class: Node<'_>) -> Vec<Node<'_>> {
    let mut decorators = Vec::new();
    let mut cursor = class.walk();
    decorators.extend(
        class
            .children(&mut cursor)
            .filter(|c| SyntaxKind::of(*c) == SyntaxKind::Decorator),
    );

    if let Some(parent) = class.parent() {
        if SyntaxKind::of(parent) == SyntaxKind::ExportStatement {
            let mut cursor = parent.walk();
            decorators.extend(
                parent
                    .children(&mut cursor)
                    .filter(|c| SyntaxKind::of(*c) == SyntaxKind::Decorator),
            );
        }
    }

    decorators.sort_by_key(|d| d.start_byte());
    decorators
}

/// `@Name(...)` o `@ns.Name(...)`. Un decorador sin llamada no cuenta.
pub fn is_decorator_call(file: &SourceFile, decorator: Node<'_>, name: &str) -> bool {
    let Some(call) = named_children(decorator).into_iter().next() else {
        return false;
    };
    if SyntaxKind::of(call) != SyntaxKind::CallExpression {
        return false;
    }
    let Some(callee) = call.child_by_field_name("function") else {
        return false;
    };
    match SyntaxKind::of(callee) {
        SyntaxKind::Identifier => file.node_text(callee) == name,
        SyntaxKind::MemberExpression => {
            member_property(callee).is_some_and(|p| file.node_text(p) == name)
        }
        _ => false,
    }
}

pub fn is_class_annotated_with(file: &SourceFile, node: Node<'_>, decorator: &str) -> bool {
    SyntaxKind::of(node).is_class()
        && class_decorators(node)
            .into_iter()
            .any(|d| is_decorator_call(file, d, decorator))
}

/// Miembros del cuerpo de una clase, en orden de declaración.
pub fn class_members(class: Node<'_>) -> Vec<Node<'_>> {
    class
        .child_by_field_name("body")
        .map(named_children)
        .unwrap_or_default()
}

/// Nodo del nombre de un miembro de clase (método, campo o firma).
pub fn member_name(member: Node<'_>) -> Option<Node<'_>> {
    match SyntaxKind::of(member) {
        SyntaxKind::MethodDefinition
        | SyntaxKind::MethodSignature
        | SyntaxKind::AbstractMethodSignature
        | SyntaxKind::FieldDefinition
        | SyntaxKind::PropertySignature => member
            .child_by_field_name("name")
            .or_else(|| member.child_by_field_name("property")),
        _ => None,
    }
}

/// Nodo a usar como ancla del nombre de una clase; las expresiones de clase
/// anónimas caen al nodo completo.
pub fn class_name_anchor(class: Node<'_>) -> Node<'_> {
    class.child_by_field_name("name").unwrap_or(class)
}

/// `true` si `node` tiene un hijo anónimo con ese texto de token (`get`, `static`...).
pub fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == token);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SourceFile {
        SourceFile::parse("test.component.ts", src).unwrap()
    }

    #[test]
    fn test_find_all_returns_source_order() {
        let file = parse("a(); b(); function f() { c(); }");
        let calls = find_all(
            file.root(),
            |n| SyntaxKind::of(n) == SyntaxKind::CallExpression,
            |_| false,
        );
        let names: Vec<_> = calls
            .iter()
            .filter_map(|c| callee_identifier(&file, *c))
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_find_all_prunes_subtrees() {
        let file = parse("a(); function f() { b(); } c();");
        let calls = find_all(
            file.root(),
            |n| SyntaxKind::of(n) == SyntaxKind::CallExpression,
            |n| n.kind() == "function_declaration",
        );
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_find_all_on_leaf_root() {
        let file = parse("x;");
        let ident = find_all(
            file.root(),
            |n| SyntaxKind::of(n) == SyntaxKind::Identifier,
            |_| false,
        )[0];
        let found = find_all(ident, |_| true, |_| false);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_component_decorator_on_exported_class() {
        let file = parse("@Component({ selector: 'x' })\nexport class A {}\nclass B {}");
        let classes = find_all(
            file.root(),
            |n| is_class_annotated_with(&file, n, "Component"),
            |_| false,
        );
        assert_eq!(classes.len(), 1);
        assert_eq!(file.node_text(class_name_anchor(classes[0])), "A");
    }

    #[test]
    fn test_component_decorator_variants() {
        let file = parse(
            "@ng.Component({}) class A {}\n@Component class B {}\n@Injectable() class C {}",
        );
        let classes = find_all(
            file.root(),
            |n| is_class_annotated_with(&file, n, "Component"),
            |_| false,
        );
        assert_eq!(classes.len(), 1);
        assert_eq!(file.node_text(class_name_anchor(classes[0])), "A");
    }

    #[test]
    fn test_member_decorator_does_not_mark_class() {
        let file = parse("class A { @Component() field = 1; }");
        let classes = find_all(
            file.root(),
            |n| is_class_annotated_with(&file, n, "Component"),
            |_| false,
        );
        assert!(classes.is_empty());
    }

    #[test]
    fn test_call_arguments_skip_comments() {
        let file = parse("f(a, /* nota */ b);");
        let call = find_all(
            file.root(),
            |n| SyntaxKind::of(n) == SyntaxKind::CallExpression,
            |_| false,
        )[0];
        let args = call_arguments(call);
        assert_eq!(args.len(), 2);
        assert_eq!(file.node_text(args[1]), "b");
    }

    #[test]
    fn test_member_call_matches_property_name() {
        let file = parse("source.pipe(x).subscribe();");
        let calls = find_all(
            file.root(),
            |n| member_call(&file, n, "subscribe").is_some(),
            |_| false,
        );
        assert_eq!(calls.len(), 1);
        let callee = member_call(&file, calls[0], "subscribe").unwrap();
        assert_eq!(file.node_text(member_property(callee).unwrap()), "subscribe");
    }

    #[test]
    fn test_class_members_and_names() {
        let file = parse("class A { x = 1; get y() { return 2; } ngOnDestroy() {} }");
        let class = find_all(
            file.root(),
            |n| SyntaxKind::of(n).is_class(),
            |_| false,
        )[0];
        let names: Vec<_> = class_members(class)
            .into_iter()
            .filter_map(member_name)
            .map(|n| file.node_text(n).to_string())
            .collect();
        assert_eq!(names, vec!["x", "y", "ngOnDestroy"]);
        let getter = class_members(class)[1];
        assert!(has_token(getter, "get"));
    }
}
