//! Typed wrappers for the backend routes the storefront uses.
//!
//! Each group borrows the [`ApiClient`] and returns the response body as
//! JSON, so failures still go through the client's classification and
//! session handling. Path segments are percent-encoded.

use reqwest::Method;
use secrecy::SecretString;
use serde_json::{Value, json};
use shopfront_core::{OrderId, OrderStatus, ProductId, UserId};

use super::{ApiClient, ApiError, ApiResponse, RequestOptions};

/// Query parameters as `(name, value)` pairs.
pub type Params<'p> = &'p [(&'p str, &'p str)];

fn seg(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

fn with_params(params: Params<'_>) -> RequestOptions {
    RequestOptions::new().query_pairs(params.iter().copied())
}

impl ApiClient {
    #[must_use]
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    #[must_use]
    pub const fn products(&self) -> ProductsApi<'_> {
        ProductsApi { client: self }
    }

    #[must_use]
    pub const fn orders(&self) -> OrdersApi<'_> {
        OrdersApi { client: self }
    }

    #[must_use]
    pub const fn inventory(&self) -> InventoryApi<'_> {
        InventoryApi { client: self }
    }

    #[must_use]
    pub const fn users(&self) -> UsersApi<'_> {
        UsersApi { client: self }
    }

    #[must_use]
    pub const fn emails(&self) -> EmailsApi<'_> {
        EmailsApi { client: self }
    }

    #[must_use]
    pub const fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi { client: self }
    }

    /// Server-side cart routes, for backends that keep the cart remotely.
    #[must_use]
    pub const fn cart(&self) -> CartApi<'_> {
        CartApi { client: self }
    }

    #[must_use]
    pub const fn wishlist(&self) -> WishlistApi<'_> {
        WishlistApi { client: self }
    }

    #[must_use]
    pub const fn reviews(&self) -> ReviewsApi<'_> {
        ReviewsApi { client: self }
    }

    #[must_use]
    pub const fn coupons(&self) -> CouponsApi<'_> {
        CouponsApi { client: self }
    }

    async fn body(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        self.request(method, path, body, options)
            .await
            .map(ApiResponse::into_body)
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Login, signup and token routes.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// Request a one-time password for a phone number.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn send_otp(&self, data: &Value) -> Result<Value, ApiError> {
        self.client.post("/users/otp", data).await.map(ApiResponse::into_body)
    }

    /// Exchange a phone number and OTP for `{user, token}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn login(&self, phone_number: &str, otp: &str) -> Result<Value, ApiError> {
        let body = json!({ "phoneNumber": phone_number, "otp": otp });
        self.client
            .post("/auth/login", &body)
            .await
            .map(ApiResponse::into_body)
    }

    /// Register a new account; responds like [`AuthApi::login`].
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn signup(&self, data: &Value) -> Result<Value, ApiError> {
        self.client
            .post("/users/register", data)
            .await
            .map(ApiResponse::into_body)
    }

    /// Check a token explicitly, regardless of what is stored.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn verify_token(&self, token: SecretString) -> Result<Value, ApiError> {
        self.client
            .body(
                Method::GET,
                "/auth/verify",
                None,
                RequestOptions::new().bearer(token),
            )
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn update_profile(&self, data: &Value) -> Result<Value, ApiError> {
        self.client
            .put("/auth/profile", data)
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn change_password(&self, data: &Value) -> Result<Value, ApiError> {
        self.client
            .put("/auth/change-password", data)
            .await
            .map(ApiResponse::into_body)
    }
}

// =============================================================================
// Products
// =============================================================================

/// Catalog browsing and product administration.
#[derive(Debug, Clone, Copy)]
pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl ProductsApi<'_> {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list(&self, params: Params<'_>) -> Result<Value, ApiError> {
        self.client
            .body(Method::GET, "/products", None, with_params(params))
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get(&self, id: &ProductId) -> Result<Value, ApiError> {
        let path = format!("/products/{}", seg(id.as_str()));
        self.client.get(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn by_category(&self, category: &str, params: Params<'_>) -> Result<Value, ApiError> {
        let path = format!("/products/category/{}", seg(category));
        self.client
            .body(Method::GET, &path, None, with_params(params))
            .await
    }

    /// Full-text search; `params` are sent alongside `q`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn search(&self, query: &str, params: Params<'_>) -> Result<Value, ApiError> {
        let options = RequestOptions::new()
            .query("q", query)
            .query_pairs(params.iter().copied());
        self.client
            .body(Method::GET, "/products/search", None, options)
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn featured(&self) -> Result<Value, ApiError> {
        self.collection("featured").await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn best_sellers(&self) -> Result<Value, ApiError> {
        self.collection("best-sellers").await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn new_arrivals(&self) -> Result<Value, ApiError> {
        self.collection("new-arrivals").await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn categories(&self) -> Result<Value, ApiError> {
        self.collection("categories").await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn filters(&self) -> Result<Value, ApiError> {
        self.collection("filters").await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn create(&self, data: &Value) -> Result<Value, ApiError> {
        self.client
            .post("/products", data)
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn update(&self, id: &ProductId, data: &Value) -> Result<Value, ApiError> {
        let path = format!("/products/{}", seg(id.as_str()));
        self.client.put(&path, data).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn delete(&self, id: &ProductId) -> Result<Value, ApiError> {
        let path = format!("/products/{}", seg(id.as_str()));
        self.client.delete(&path).await.map(ApiResponse::into_body)
    }

    /// Set the stock level of a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn update_stock(&self, id: &ProductId, stock: u32) -> Result<Value, ApiError> {
        let path = format!("/products/{}/stock", seg(id.as_str()));
        self.client
            .patch(&path, &json!({ "stock": stock }))
            .await
            .map(ApiResponse::into_body)
    }

    async fn collection(&self, name: &str) -> Result<Value, ApiError> {
        self.client
            .get(&format!("/products/{name}"))
            .await
            .map(ApiResponse::into_body)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Order placement, tracking and administration.
#[derive(Debug, Clone, Copy)]
pub struct OrdersApi<'a> {
    client: &'a ApiClient,
}

impl OrdersApi<'_> {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn create(&self, data: &Value) -> Result<Value, ApiError> {
        self.client
            .post("/orders", data)
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get(&self, id: &OrderId) -> Result<Value, ApiError> {
        let path = format!("/orders/{}", seg(id.as_str()));
        self.client.get(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn for_user(&self, user_id: &UserId) -> Result<Value, ApiError> {
        let path = format!("/orders/user/{}", seg(user_id.as_str()));
        self.client.get(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn track(&self, id: &OrderId) -> Result<Value, ApiError> {
        let path = format!("/orders/{}/track", seg(id.as_str()));
        self.client.get(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list(&self, params: Params<'_>) -> Result<Value, ApiError> {
        self.client
            .body(Method::GET, "/orders", None, with_params(params))
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Value, ApiError> {
        let path = format!("/orders/{}/status", seg(id.as_str()));
        self.client
            .patch(&path, &json!({ "status": status }))
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn stats(&self) -> Result<Value, ApiError> {
        self.client
            .get("/orders/stats")
            .await
            .map(ApiResponse::into_body)
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Stock levels and alerts.
#[derive(Debug, Clone, Copy)]
pub struct InventoryApi<'a> {
    client: &'a ApiClient,
}

impl InventoryApi<'_> {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list(&self, params: Params<'_>) -> Result<Value, ApiError> {
        self.client
            .body(Method::GET, "/inventory", None, with_params(params))
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        let path = format!("/inventory/{}", seg(id));
        self.client.get(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn update(&self, id: &str, data: &Value) -> Result<Value, ApiError> {
        let path = format!("/inventory/{}", seg(id));
        self.client.put(&path, data).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn low_stock(&self) -> Result<Value, ApiError> {
        self.client
            .get("/inventory/low-stock")
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn alerts(&self) -> Result<Value, ApiError> {
        self.client
            .get("/inventory/alerts")
            .await
            .map(ApiResponse::into_body)
    }
}

// =============================================================================
// Users
// =============================================================================

/// User administration.
#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl UsersApi<'_> {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list(&self, params: Params<'_>) -> Result<Value, ApiError> {
        self.client
            .body(Method::GET, "/users", None, with_params(params))
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get(&self, id: &UserId) -> Result<Value, ApiError> {
        let path = format!("/users/{}", seg(id.as_str()));
        self.client.get(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn update(&self, id: &UserId, data: &Value) -> Result<Value, ApiError> {
        let path = format!("/users/{}", seg(id.as_str()));
        self.client.put(&path, data).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn delete(&self, id: &UserId) -> Result<Value, ApiError> {
        let path = format!("/users/{}", seg(id.as_str()));
        self.client.delete(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn stats(&self) -> Result<Value, ApiError> {
        self.client
            .get("/users/stats")
            .await
            .map(ApiResponse::into_body)
    }
}

// =============================================================================
// Emails
// =============================================================================

/// Transactional and custom email sending.
#[derive(Debug, Clone, Copy)]
pub struct EmailsApi<'a> {
    client: &'a ApiClient,
}

impl EmailsApi<'_> {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn send_order_confirmation(&self, order_id: &OrderId) -> Result<Value, ApiError> {
        let path = format!("/emails/order-confirmation/{}", seg(order_id.as_str()));
        self.client
            .body(Method::POST, &path, None, RequestOptions::new())
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn send_payment_confirmation(&self, payment_id: &str) -> Result<Value, ApiError> {
        let path = format!("/emails/payment-confirmation/{}", seg(payment_id));
        self.client
            .body(Method::POST, &path, None, RequestOptions::new())
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn send_shipping_notification(&self, order_id: &OrderId) -> Result<Value, ApiError> {
        let path = format!("/emails/shipping-notification/{}", seg(order_id.as_str()));
        self.client
            .body(Method::POST, &path, None, RequestOptions::new())
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn send_custom(&self, data: &Value) -> Result<Value, ApiError> {
        self.client
            .post("/emails/custom", data)
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn templates(&self) -> Result<Value, ApiError> {
        self.client
            .get("/emails/templates")
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn update_template(&self, id: &str, data: &Value) -> Result<Value, ApiError> {
        let path = format!("/emails/templates/{}", seg(id));
        self.client.put(&path, data).await.map(ApiResponse::into_body)
    }
}

// =============================================================================
// Analytics
// =============================================================================

/// Dashboard and reporting figures.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl AnalyticsApi<'_> {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn dashboard(&self) -> Result<Value, ApiError> {
        self.client
            .get("/analytics/dashboard")
            .await
            .map(ApiResponse::into_body)
    }

    /// Sales figures for a reporting period such as `7d` or `month`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn sales(&self, period: &str) -> Result<Value, ApiError> {
        let path = format!("/analytics/sales/{}", seg(period));
        self.client.get(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn top_products(&self, limit: u32) -> Result<Value, ApiError> {
        self.client
            .get_with(
                "/analytics/top-products",
                RequestOptions::new().query("limit", limit),
            )
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn customers(&self) -> Result<Value, ApiError> {
        self.client
            .get("/analytics/customers")
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn revenue(&self, period: &str) -> Result<Value, ApiError> {
        let path = format!("/analytics/revenue/{}", seg(period));
        self.client.get(&path).await.map(ApiResponse::into_body)
    }
}

// =============================================================================
// Server-side cart
// =============================================================================

/// Remote cart items.
#[derive(Debug, Clone, Copy)]
pub struct CartApi<'a> {
    client: &'a ApiClient,
}

impl CartApi<'_> {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get(&self) -> Result<Value, ApiError> {
        self.client.get("/cart").await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn add(&self, data: &Value) -> Result<Value, ApiError> {
        self.client
            .post("/cart/items", data)
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn update(&self, item_id: &str, data: &Value) -> Result<Value, ApiError> {
        let path = format!("/cart/items/{}", seg(item_id));
        self.client.put(&path, data).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn remove(&self, item_id: &str) -> Result<Value, ApiError> {
        let path = format!("/cart/items/{}", seg(item_id));
        self.client.delete(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn clear(&self) -> Result<Value, ApiError> {
        self.client.delete("/cart").await.map(ApiResponse::into_body)
    }
}

// =============================================================================
// Wishlist
// =============================================================================

/// The signed-in user's saved products.
#[derive(Debug, Clone, Copy)]
pub struct WishlistApi<'a> {
    client: &'a ApiClient,
}

impl WishlistApi<'_> {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get(&self) -> Result<Value, ApiError> {
        self.client.get("/wishlist").await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn add(&self, product_id: &ProductId) -> Result<Value, ApiError> {
        self.client
            .post("/wishlist", &json!({ "productId": product_id }))
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn remove(&self, product_id: &ProductId) -> Result<Value, ApiError> {
        let path = format!("/wishlist/{}", seg(product_id.as_str()));
        self.client.delete(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn clear(&self) -> Result<Value, ApiError> {
        self.client
            .delete("/wishlist")
            .await
            .map(ApiResponse::into_body)
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// Product reviews.
#[derive(Debug, Clone, Copy)]
pub struct ReviewsApi<'a> {
    client: &'a ApiClient,
}

impl ReviewsApi<'_> {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn for_product(&self, product_id: &ProductId) -> Result<Value, ApiError> {
        let path = format!("/reviews/product/{}", seg(product_id.as_str()));
        self.client.get(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn create(&self, data: &Value) -> Result<Value, ApiError> {
        self.client
            .post("/reviews", data)
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn update(&self, id: &str, data: &Value) -> Result<Value, ApiError> {
        let path = format!("/reviews/{}", seg(id));
        self.client.put(&path, data).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        let path = format!("/reviews/{}", seg(id));
        self.client.delete(&path).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list(&self, params: Params<'_>) -> Result<Value, ApiError> {
        self.client
            .body(Method::GET, "/reviews", None, with_params(params))
            .await
    }
}

// =============================================================================
// Coupons
// =============================================================================

/// Discount codes.
#[derive(Debug, Clone, Copy)]
pub struct CouponsApi<'a> {
    client: &'a ApiClient,
}

impl CouponsApi<'_> {
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn validate(&self, code: &str) -> Result<Value, ApiError> {
        self.client
            .post("/coupons/validate", &json!({ "code": code }))
            .await
            .map(ApiResponse::into_body)
    }

    /// Apply a code to an order. Fields of `order` are sent alongside `code`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn apply(&self, code: &str, order: &Value) -> Result<Value, ApiError> {
        self.client
            .post("/coupons/apply", &coupon_application(code, order))
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list(&self, params: Params<'_>) -> Result<Value, ApiError> {
        self.client
            .body(Method::GET, "/coupons", None, with_params(params))
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn create(&self, data: &Value) -> Result<Value, ApiError> {
        self.client
            .post("/coupons", data)
            .await
            .map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn update(&self, id: &str, data: &Value) -> Result<Value, ApiError> {
        let path = format!("/coupons/{}", seg(id));
        self.client.put(&path, data).await.map(ApiResponse::into_body)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        let path = format!("/coupons/{}", seg(id));
        self.client.delete(&path).await.map(ApiResponse::into_body)
    }
}

/// `{code, ...order}`; a non-object `order` contributes nothing.
fn coupon_application(code: &str, order: &Value) -> Value {
    let mut body = order.as_object().cloned().unwrap_or_default();
    body.insert("code".to_owned(), Value::from(code));
    Value::Object(body)
}
