//! Declaraciones conocidas de RxJS y Angular.
//!
//! Sustituyen a los `.d.ts` de las librerías: el analizador no carga
//! `node_modules`, así que la jerarquía de streams se declara aquí.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::StaticType;

pub const OBSERVABLE: &str = "Observable";

/// Tipo nominal -> tipos base declarados.
static PRELUDE_BASES: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("Observable", &[][..]),
        ("Subject", &["Observable"][..]),
        ("BehaviorSubject", &["Subject"][..]),
        ("ReplaySubject", &["Subject"][..]),
        ("AsyncSubject", &["Subject"][..]),
        ("AnonymousSubject", &["Subject"][..]),
        ("ConnectableObservable", &["Observable"][..]),
        ("GroupedObservable", &["Observable"][..]),
        // @angular/core
        ("EventEmitter", &["Subject"][..]),
        // @ngrx/store
        ("Store", &["Observable"][..]),
        // @angular/router, @angular/common/http, @angular/forms
        ("ActivatedRoute", &[][..]),
        ("Router", &[][..]),
        ("HttpClient", &[][..]),
        ("AbstractControl", &[][..]),
        ("FormControl", &["AbstractControl"][..]),
        ("FormGroup", &["AbstractControl"][..]),
        ("FormArray", &["AbstractControl"][..]),
    ])
});

/// Funciones de creación que devuelven un `Observable`.
const CREATION_FUNCTIONS: &[&str] = &[
    "of",
    "from",
    "interval",
    "timer",
    "merge",
    "concat",
    "combineLatest",
    "forkJoin",
    "zip",
    "race",
    "defer",
    "fromEvent",
    "fromEventPattern",
    "throwError",
    "iif",
    "range",
    "generate",
    "using",
    "onErrorResumeNext",
];

/// Constantes exportadas con tipo `Observable<never>`.
const STREAM_CONSTANTS: &[&str] = &["EMPTY", "NEVER"];

pub fn prelude_bases(name: &str) -> Vec<StaticType> {
    PRELUDE_BASES
        .get(name)
        .map(|bases| bases.iter().map(|b| StaticType::nominal(*b)).collect())
        .unwrap_or_default()
}

/// Tipo de retorno de `recv.method()` cuando `recv` es el tipo de preludio `type_name`.
/// No sigue la herencia: eso lo hace quien llama.
pub fn prelude_method(type_name: &str, method: &str) -> Option<StaticType> {
    let returns_stream = matches!(
        (type_name, method),
        ("Observable", "pipe" | "asObservable" | "lift")
            | ("Store", "select")
            | (
                "HttpClient",
                "get" | "post" | "put" | "patch" | "delete" | "head" | "options" | "request" | "jsonp"
            )
    );
    returns_stream.then(|| StaticType::nominal(OBSERVABLE))
}

/// Tipo de `recv.property` cuando `recv` es el tipo de preludio `type_name`.
pub fn prelude_property(type_name: &str, property: &str) -> Option<StaticType> {
    let is_stream = matches!(
        (type_name, property),
        (
            "ActivatedRoute",
            "params" | "queryParams" | "data" | "fragment" | "url" | "paramMap" | "queryParamMap" | "title"
        ) | ("Router", "events")
            | ("AbstractControl", "valueChanges" | "statusChanges")
    );
    is_stream.then(|| StaticType::nominal(OBSERVABLE))
}

pub fn prelude_function(name: &str) -> Option<StaticType> {
    CREATION_FUNCTIONS
        .contains(&name)
        .then(|| StaticType::nominal(OBSERVABLE))
}

pub fn prelude_constant(name: &str) -> Option<StaticType> {
    STREAM_CONSTANTS
        .contains(&name)
        .then(|| StaticType::nominal(OBSERVABLE))
}
