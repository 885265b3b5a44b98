//! # Repository Module
//!
//! Product persistence on top of a caller-supplied session.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │                                                                 │
//! │       │  repo.create(&mut session, &mut product)                       │
//! │       │  repo.find_by_category(Category::Food).fetch_all(&mut session) │
//! │       ▼                                                                 │
//! │  ProductRepository  (product.rs)                                       │
//! │  ├── create / update / delete / delete_all                             │
//! │  ├── find / all / count                                                │
//! │  └── find_by_name / _price / _availability / _category ──┐             │
//! │                                                          ▼             │
//! │  ProductQuery  (query.rs)                                              │
//! │  └── count / fetch_all / first / fetch                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite `products` table                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod product;
pub mod query;
