pub mod index_object;
pub mod undirected;
