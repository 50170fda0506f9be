//! # takeuntil-lint
//!
//! Regla estática para componentes Angular: toda suscripción a un `Observable`
//! dentro de una clase `@Component()` debe terminar su `pipe` con
//! `takeUntil(this.destroy$)`, y `ngOnDestroy()` debe llamar a `.next()` y
//! `.complete()` sobre cada señal usada.

pub mod commands;
pub mod config;
pub mod files;
pub mod rules;
pub mod ui;
