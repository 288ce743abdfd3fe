//! An in-process object model implementing [`ObjectModel`](crate::ObjectModel).
//!
//! Enabled by the `memory` feature (on by default). Useful for tests, demos
//! and as a template for bindings to a real reflective runtime.
//!
//! # Example
//!
//! ```rust
//! use metaview::memory::MemoryModel;
//! use metaview::{Session, TypeRef};
//!
//! let mut model = MemoryModel::new();
//! let element = model.metaclass("ModelElement", &[]);
//! model.attribute(element, "getName", TypeRef::String);
//! let actor = model.metaclass("Actor", &[element]);
//! let use_case = model.metaclass("UseCase", &[element]);
//! model.references(use_case, "getActors", actor);
//!
//! let login = model.create(use_case);
//! model.set(login, "getName", "Login");
//! let user = model.create(actor);
//! model.set(user, "getName", "User");
//! model.link_all(login, "getActors", [user]);
//!
//! let session = Session::new(model);
//! let info = session.element_info(&login);
//! assert_eq!(info.slot("getActors").unwrap().card(), 1);
//! ```

mod model;

pub use model::{MemoryModel, MetaclassId, ObjectId};
