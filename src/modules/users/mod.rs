pub mod models;
pub mod password;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Module};
use serde_json::json;

use models::CreateUserForm;
use password::Argon2Hasher;
use repository::MemoryUserRepository;
use service::UserService;

/// Users module: account CRUD with hashed passwords and unique usernames
pub struct UsersModule {
    service: Arc<UserService>,
}

impl UsersModule {
    pub fn new(service: Arc<UserService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<UserService> {
        &self.service
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "users module initialized"
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
        let user = self
            .service
            .create(CreateUserForm {
                username: "root".to_string(),
                email: "root@bookstore.com".to_string(),
                password: "toor".to_string(),
            })
            .await
            .context("failed to create root user")?;
        tracing::info!(user_id = user.id, username = %user.username, "root user created");
        Ok(())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "users module stopped");
        Ok(())
    }
}

fn json_content(schema: serde_json::Value) -> serde_json::Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": "#/components/schemas/ErrorResponse" }))
    })
}

fn user_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": "#/components/schemas/UserDto" }))
    })
}

fn user_id_parameter() -> serde_json::Value {
    json!({
        "name": "user_id",
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
                    "summary": "Get all users",
                    "tags": ["Users"],
                    "responses": {
                        "200": {
                            "description": "Success",
                            "content": json_content(json!({
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/UserDto" }
                            }))
                        }
                    }
                },
                "post": {
                    "summary": "Create a new user",
                    "tags": ["Users"],
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({ "$ref": "#/components/schemas/CreateUserForm" }))
                    },
                    "responses": {
                        "201": user_response("User created successfully"),
                        "400": error_response("Invalid input"),
                        "409": error_response("Username already taken"),
                        "500": error_response("Error while creating the user")
                    }
                }
            },
            "/{user_id}": {
                "get": {
                    "summary": "Get user by ID",
                    "tags": ["Users"],
                    "parameters": [user_id_parameter()],
                    "responses": {
                        "200": user_response("Success"),
                        "404": error_response("User not found")
                    }
                },
                "patch": {
                    "summary": "Update an existing user",
                    "tags": ["Users"],
                    "parameters": [user_id_parameter()],
                    "requestBody": {
                        "required": true,
                        "content": json_content(json!({ "$ref": "#/components/schemas/UpdateUserForm" }))
                    },
                    "responses": {
                        "200": user_response("User updated successfully"),
                        "400": error_response("Invalid input"),
                        "404": error_response("User not found"),
                        "500": error_response("Error while updating the user")
                    }
                },
                "delete": {
                    "summary": "Delete a user by ID",
                    "tags": ["Users"],
                    "parameters": [user_id_parameter()],
                    "responses": {
                        "204": { "description": "User deleted successfully" },
                        "404": error_response("User not found"),
                        "500": error_response("Error while deleting the user")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "UserDto": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "username": { "type": "string" },
                        "email": { "type": "string", "format": "email" }
                    },
                    "required": ["id", "username", "email"]
                },
                "CreateUserForm": {
                    "type": "object",
                    "properties": {
                        "username": { "type": "string" },
                        "email": { "type": "string", "format": "email" },
                        "password": { "type": "string", "format": "password" }
                    },
                    "required": ["username", "email", "password"]
                },
                "UpdateUserForm": {
                    "type": "object",
                    "properties": {
                        "email": { "type": "string", "format": "email" },
                        "password": { "type": "string", "format": "password" }
                    }
                }
            }
        }
    })
}

/// Create the users module over an empty in-memory store with Argon2 hashing
pub fn create_module() -> Arc<dyn Module> {
    let repository = Arc::new(MemoryUserRepository::new());
    let hasher = Arc::new(Argon2Hasher::new());
    Arc::new(UsersModule::new(Arc::new(UserService::new(
        repository, hasher,
    ))))
}
