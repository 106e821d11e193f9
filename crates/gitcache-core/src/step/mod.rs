//! Definiciones relacionadas a Steps.
//!
//! Un step es una acción asíncrona que muta el contexto compartido y emite
//! un evento nombrado. Este módulo define:
//! - `StepFlow`: interfaz del workflow completo (estados, eventos, tabla).
//! - `StepEmit`: resultado de la acción de un step.

pub mod definition;

pub use definition::{StepEmit, StepFlow};
