//! Estado de carga de un recurso
//!
//! Este módulo modela el ciclo `idle -> loading -> success | error` de una
//! vista que consulta la API. Cada recarga o cambio de parámetros vuelve a
//! `Loading`. No hay caché ni deduplicación de peticiones: una petición
//! superada por otra más reciente se descarta al completar. Tras un error
//! se conservan los últimos datos cargados con éxito.

use std::fmt::Display;
use std::future::Future;

/// Estado observable de una consulta
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading { last_good: Option<T> },
    Success(T),
    Error { message: String, last_good: Option<T> },
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<T> FetchState<T> {
    /// Datos a mostrar: los actuales o los últimos buenos
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Idle => None,
            FetchState::Success(data) => Some(data),
            FetchState::Loading { last_good } | FetchState::Error { last_good, .. } => last_good.as_ref(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    fn into_last_good(self) -> Option<T> {
        match self {
            FetchState::Idle => None,
            FetchState::Success(data) => Some(data),
            FetchState::Loading { last_good } | FetchState::Error { last_good, .. } => last_good,
        }
    }
}

/// Recurso con parámetros de búsqueda y su estado de carga
#[derive(Debug)]
pub struct Resource<P, T> {
    params: P,
    state: FetchState<T>,
    generation: u64,
}

impl<P: Clone, T> Resource<P, T> {
    pub fn new(params: P) -> Self {
        Self {
            params,
            state: FetchState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    /// Pasa a `Loading` y devuelve la generación de la nueva petición
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        let previous = std::mem::take(&mut self.state);
        self.state = FetchState::Loading {
            last_good: previous.into_last_good(),
        };
        self.generation
    }

    /// Aplica el resultado de la petición `generation`. Devuelve `false`
    /// si una petición más reciente la ha superado.
    pub fn complete<E: Display>(&mut self, generation: u64, result: Result<T, E>) -> bool {
        if generation != self.generation {
            tracing::debug!("⏭️ Respuesta obsoleta descartada (generación {} < {})", generation, self.generation);
            return false;
        }

        let previous = std::mem::take(&mut self.state);
        self.state = match result {
            Ok(data) => FetchState::Success(data),
            Err(e) => FetchState::Error {
                message: e.to_string(),
                last_good: previous.into_last_good(),
            },
        };
        true
    }

    /// Cambia los parámetros de búsqueda e inicia una nueva carga
    pub fn set_params(&mut self, params: P) -> u64 {
        self.params = params;
        self.begin()
    }

    /// Recarga con los parámetros actuales
    pub async fn refetch<F, Fut, E>(&mut self, fetch: F) -> &FetchState<T>
    where
        F: FnOnce(P) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let generation = self.begin();
        let result = fetch(self.params.clone()).await;
        self.complete(generation, result);
        &self.state
    }
}
