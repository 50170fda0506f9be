//! Oráculo de tipos.
//!
//! El motor de reglas no conoce el verificador de tipos concreto: sólo habla
//! con [`TypeResolver`] (tipo estático de una expresión) y [`TypeUniverse`]
//! (tipos base declarados de un tipo nominal). [`could_be_type`] es el
//! predicado recursivo que decide si un tipo puede ser un tipo nominal dado.

pub mod declared;
pub mod prelude;

pub use declared::DeclaredTypes;

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use tree_sitter::Node;

/// Tipo estático resuelto para una expresión.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticType {
    /// Tipo nominal con símbolo (`Observable`, `MyService`).
    Nominal(String),
    /// Instanciación genérica: `target` es el tipo de origen.
    Generic {
        target: Box<StaticType>,
        arguments: Vec<StaticType>,
    },
    Union(Vec<StaticType>),
    /// Primitivos y literales (`number`, `null`, `'a'`): sin símbolo nominal.
    Primitive(String),
    Unknown,
}

impl StaticType {
    pub fn nominal(name: impl Into<String>) -> Self {
        Self::Nominal(name.into())
    }

    pub fn generic(target: StaticType, arguments: Vec<StaticType>) -> Self {
        Self::Generic {
            target: Box::new(target),
            arguments,
        }
    }

    /// Construye una unión aplanando uniones anidadas y descartando `Unknown`.
    /// Una unión de un solo miembro colapsa a ese miembro.
    pub fn union_of(members: impl IntoIterator<Item = StaticType>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                StaticType::Union(inner) => flat.extend(inner),
                StaticType::Unknown => {}
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => StaticType::Unknown,
            1 => flat.remove(0),
            _ => StaticType::Union(flat),
        }
    }

    pub fn is_generic_instantiation(&self) -> bool {
        matches!(self, Self::Generic { .. })
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Nombre del símbolo nominal, si lo tiene.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            Self::Nominal(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nominal(name) | Self::Primitive(name) => write!(f, "{}", name),
            Self::Generic { target, arguments } => {
                write!(f, "{}<", target)?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Nombre (o patrón) del tipo nominal buscado.
#[derive(Debug, Clone)]
pub enum NamePattern {
    Exact(String),
    Regex(Regex),
}

impl NamePattern {
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Regex)
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == name,
            Self::Regex(re) => re.is_match(name),
        }
    }
}

/// Universo de tipos de sólo lectura.
pub trait TypeUniverse {
    /// Tipos base declarados del tipo nominal `name` (vacío si no tiene).
    fn base_types(&self, name: &str) -> Vec<StaticType>;
}

/// Servicio de resolución de tipos para un archivo ya parseado.
pub trait TypeResolver {
    /// Tipo estático de la expresión `node`; `Unknown` si no se puede determinar.
    fn type_of(&self, node: Node<'_>) -> StaticType;
}

/// `true` si el símbolo nominal de `ty` coincide con `pattern`.
pub fn is_type(ty: &StaticType, pattern: &NamePattern) -> bool {
    ty.symbol_name().is_some_and(|name| pattern.matches(name))
}

/// Decide si `ty` podría ser el tipo nominal `pattern`.
///
/// Desenvuelve una instanciación genérica (una sola vez por llamada),
/// compara el símbolo, reparte sobre los miembros de una unión y recorre los
/// tipos base declarados. Cada tipo nominal se expande como mucho una vez,
/// así que una jerarquía cíclica termina con `false`.
pub fn could_be_type<U: TypeUniverse + ?Sized>(
    universe: &U,
    ty: &StaticType,
    pattern: &NamePattern,
) -> bool {
    let mut expanded = HashSet::new();
    could_be(universe, ty, pattern, &mut expanded)
}

fn could_be<U: TypeUniverse + ?Sized>(
    universe: &U,
    ty: &StaticType,
    pattern: &NamePattern,
    expanded: &mut HashSet<String>,
) -> bool {
    let ty = match ty {
        StaticType::Generic { target, .. } => target.as_ref(),
        other => other,
    };

    if is_type(ty, pattern) {
        return true;
    }

    if let StaticType::Union(members) = ty {
        return members
            .iter()
            .any(|member| could_be(universe, member, pattern, expanded));
    }

    let Some(name) = ty.symbol_name() else {
        return false;
    };
    if !expanded.insert(name.to_string()) {
        return false;
    }
    universe
        .base_types(name)
        .iter()
        .any(|base| could_be(universe, base, pattern, expanded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Universe(HashMap<&'static str, Vec<StaticType>>);

    impl TypeUniverse for Universe {
        fn base_types(&self, name: &str) -> Vec<StaticType> {
            self.0.get(name).cloned().unwrap_or_default()
        }
    }

    fn universe(entries: &[(&'static str, Vec<StaticType>)]) -> Universe {
        Universe(entries.iter().cloned().collect())
    }

    fn observable() -> NamePattern {
        NamePattern::exact("Observable")
    }

    #[test]
    fn test_nominal_match() {
        let u = universe(&[]);
        assert!(could_be_type(&u, &StaticType::nominal("Observable"), &observable()));
        assert!(!could_be_type(&u, &StaticType::nominal("Promise"), &observable()));
    }

    #[test]
    fn test_generic_instantiation_is_unwrapped() {
        let u = universe(&[]);
        let ty = StaticType::generic(
            StaticType::nominal("Observable"),
            vec![StaticType::Primitive("number".into())],
        );
        assert!(ty.is_generic_instantiation());
        assert!(could_be_type(&u, &ty, &observable()));
    }

    #[test]
    fn test_union_any_member() {
        let u = universe(&[]);
        let ty = StaticType::Union(vec![
            StaticType::Primitive("null".into()),
            StaticType::generic(StaticType::nominal("Observable"), vec![]),
        ]);
        assert!(could_be_type(&u, &ty, &observable()));

        let none = StaticType::Union(vec![
            StaticType::Primitive("null".into()),
            StaticType::nominal("Promise"),
        ]);
        assert!(!could_be_type(&u, &none, &observable()));
    }

    #[test]
    fn test_transitive_inheritance() {
        let u = universe(&[
            ("BehaviorSubject", vec![StaticType::nominal("Subject")]),
            (
                "Subject",
                vec![StaticType::generic(StaticType::nominal("Observable"), vec![])],
            ),
        ]);
        assert!(could_be_type(&u, &StaticType::nominal("BehaviorSubject"), &observable()));
    }

    #[test]
    fn test_generic_whose_target_is_union() {
        let u = universe(&[]);
        let ty = StaticType::generic(
            StaticType::Union(vec![
                StaticType::Primitive("undefined".into()),
                StaticType::nominal("Observable"),
            ]),
            vec![],
        );
        assert!(could_be_type(&u, &ty, &observable()));
    }

    #[test]
    fn test_base_types_may_be_unions() {
        let u = universe(&[(
            "Weird",
            vec![StaticType::Union(vec![
                StaticType::nominal("Foo"),
                StaticType::nominal("Observable"),
            ])],
        )]);
        assert!(could_be_type(&u, &StaticType::nominal("Weird"), &observable()));
    }

    #[test]
    fn test_no_symbol_is_false() {
        let u = universe(&[]);
        assert!(!could_be_type(&u, &StaticType::Unknown, &observable()));
        assert!(!could_be_type(&u, &StaticType::Primitive("any".into()), &observable()));
    }

    #[test]
    fn test_cyclic_hierarchy_terminates() {
        let u = universe(&[
            ("A", vec![StaticType::nominal("B")]),
            ("B", vec![StaticType::generic(StaticType::nominal("A"), vec![])]),
        ]);
        assert!(!could_be_type(&u, &StaticType::nominal("A"), &observable()));
    }

    #[test]
    fn test_regex_pattern() {
        let u = universe(&[]);
        let pattern = NamePattern::regex("^(Observable|Subject)$").unwrap();
        assert!(could_be_type(&u, &StaticType::nominal("Subject"), &pattern));
        assert!(!could_be_type(&u, &StaticType::nominal("SubjectLike"), &pattern));
    }

    #[test]
    fn test_union_of_flattens_and_collapses() {
        let ty = StaticType::union_of(vec![
            StaticType::Unknown,
            StaticType::Union(vec![StaticType::nominal("A")]),
        ]);
        assert_eq!(ty, StaticType::nominal("A"));
        assert!(StaticType::union_of(vec![StaticType::Unknown]).is_unknown());
        let two = StaticType::union_of(vec![StaticType::nominal("A"), StaticType::nominal("B")]);
        assert!(two.is_union());
        assert_eq!(two.to_string(), "A | B");
    }
}
