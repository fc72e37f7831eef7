pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Module};
use serde_json::json;

use models::CreateBookForm;
use repository::MemoryBookRepository;
use service::BookService;

/// Books module: CRUD over the book catalogue
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(service: Arc<BookService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<BookService> {
        &self.service
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn seed(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "init database");
        let book = self
            .service
            .create(CreateBookForm {
                title: "book-title".to_string(),
                description: "book-description".to_string(),
            })
            .await
            .context("failed to create sample book")?;
        tracing::info!(book_id = book.id, "sample book created");
        Ok(())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn book_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookDto" }
            }
        }
    })
}

fn book_id_parameter() -> serde_json::Value {
    json!({
        "name": "book_id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

fn openapi_fragment() -> serde_json::Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "Get all books",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "Success",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/BookDto" }
                                    }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "summary": "Create a new book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBookForm" }
                            }
                        }
                    },
                    "responses": {
                        "201": book_response("Book created successfully"),
                        "400": error_response("Invalid input"),
                        "500": error_response("Error while creating the book")
                    }
                }
            },
            "/{book_id}": {
                "get": {
                    "summary": "Get book by ID",
                    "tags": ["Books"],
                    "parameters": [book_id_parameter()],
                    "responses": {
                        "200": book_response("Success"),
                        "404": error_response("Book not found")
                    }
                },
                "patch": {
                    "summary": "Update an existing book",
                    "tags": ["Books"],
                    "parameters": [book_id_parameter()],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/UpdateBookForm" }
                            }
                        }
                    },
                    "responses": {
                        "200": book_response("Book updated successfully"),
                        "400": error_response("Invalid input"),
                        "404": error_response("Book not found"),
                        "500": error_response("Error while updating the book")
                    }
                },
                "delete": {
                    "summary": "Delete a book by ID",
                    "tags": ["Books"],
                    "parameters": [book_id_parameter()],
                    "responses": {
                        "204": { "description": "Book deleted successfully" },
                        "404": error_response("Book not found"),
                        "500": error_response("Error while deleting the book")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "BookDto": {
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "integer",
                            "format": "int64",
                            "description": "The unique identifier of the book"
                        },
                        "title": {
                            "type": "string",
                            "description": "The title of the book"
                        },
                        "description": {
                            "type": "string",
                            "description": "The description of the book"
                        }
                    },
                    "required": ["id", "title", "description"]
                },
                "CreateBookForm": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "The title of the new book"
                        },
                        "description": {
                            "type": "string",
                            "description": "The description of the new book"
                        }
                    },
                    "required": ["title", "description"]
                },
                "UpdateBookForm": {
                    "type": "object",
                    "properties": {
                        "description": {
                            "type": "string",
                            "description": "The updated description of the book"
                        }
                    }
                }
            }
        }
    })
}

/// Create the books module over an empty in-memory store
pub fn create_module() -> Arc<dyn Module> {
    let repository = Arc::new(MemoryBookRepository::new());
    Arc::new(BooksModule::new(Arc::new(BookService::new(repository))))
}
