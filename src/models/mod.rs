//! Domain models and DTOs for the instrumentos catalog.

pub mod categoria;
pub mod common;
pub mod dashboard;
pub mod instrumento;
pub mod marca;
pub mod modelo;
pub mod populate;
pub mod sub_categoria;

// Re-export commonly used types
pub use categoria::{CategoriaListResponse, CategoriaRequest, CategoriaResponse, ListCategoriasQuery};
pub use common::IdNome;
pub use dashboard::{ContagemChave, DashboardResponse, GrupoContagem};
pub use instrumento::{
    EstadoConservacao, FotoResponse, InstrumentoDetailResponse, InstrumentoListResponse,
    InstrumentoRequest, InstrumentoSummary, ListInstrumentosQuery, StatusInstrumento,
};
pub use marca::{ListMarcasQuery, MarcaListResponse, MarcaRequest, MarcaResponse};
pub use modelo::{ListModelosQuery, ModeloListResponse, ModeloRequest, ModeloResponse};
pub use populate::{PopulateRequest, PopulateResponse, PopulateTableResult};
pub use sub_categoria::{
    ListSubCategoriasQuery, SubCategoriaListResponse, SubCategoriaRequest, SubCategoriaResponse,
};
