//! Backend service catalog used to describe failed calls.
//!
//! Each entry maps a path fragment to the backend service that owns it along
//! with the steps an operator would take to bring that service back. Entries
//! are matched in order against the request path and the first hit wins, so
//! `/users/otp` belongs to the user service and `/auth/verify` to
//! authentication.

use serde::Serialize;

/// Descriptive metadata for one backend service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    /// Path fragment identifying the service (empty for the fallback).
    #[serde(skip)]
    pub path: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub connection_steps: &'static [&'static str],
}

/// Known services in match order.
pub static SERVICES: &[ServiceInfo] = &[
    ServiceInfo {
        path: "/auth",
        name: "Authentication Service",
        description: "Handles user login, signup, and token verification",
        connection_steps: &[
            "Ensure backend authentication service is running on port 8080",
            "Verify JWT token configuration in environment variables",
            "Check database connection for user credentials storage",
            "Confirm OTP service integration (SMS/Email provider)",
        ],
    },
    ServiceInfo {
        path: "/products",
        name: "Product Catalog Service",
        description: "Manages product information, categories, and inventory",
        connection_steps: &[
            "Start product microservice on designated port",
            "Connect to product database (MongoDB/PostgreSQL)",
            "Verify image storage service (AWS S3/CloudFront)",
            "Check search engine integration (Elasticsearch)",
        ],
    },
    ServiceInfo {
        path: "/orders",
        name: "Order Management Service",
        description: "Processes orders, tracking, and order history",
        connection_steps: &[
            "Launch order processing service",
            "Connect to orders database",
            "Verify payment gateway integration",
            "Check shipping provider API connections",
        ],
    },
    ServiceInfo {
        path: "/payments",
        name: "Payment Processing Service",
        description: "Handles payment transactions and refunds",
        connection_steps: &[
            "Configure payment gateway (Stripe/PayPal)",
            "Set up webhook endpoints for payment events",
            "Verify SSL certificates for secure transactions",
            "Test payment provider API credentials",
        ],
    },
    ServiceInfo {
        path: "/cart",
        name: "Shopping Cart Service",
        description: "Manages user shopping cart and session data",
        connection_steps: &[
            "Start cart service with Redis/session storage",
            "Configure session timeout settings",
            "Verify user authentication integration",
            "Check cart persistence database connection",
        ],
    },
    ServiceInfo {
        path: "/users",
        name: "User Management Service",
        description: "Handles user profiles and administrative functions",
        connection_steps: &[
            "Start user management microservice",
            "Connect to user database",
            "Verify role-based access control (RBAC)",
            "Check email notification service integration",
        ],
    },
    ServiceInfo {
        path: "/inventory",
        name: "Inventory Management Service",
        description: "Tracks stock levels and inventory updates",
        connection_steps: &[
            "Launch inventory tracking service",
            "Connect to inventory database",
            "Set up real-time stock update webhooks",
            "Configure low-stock alert notifications",
        ],
    },
    ServiceInfo {
        path: "/emails",
        name: "Email Notification Service",
        description: "Sends transactional and marketing emails",
        connection_steps: &[
            "Configure email service provider (SendGrid/AWS SES)",
            "Set up email templates and SMTP settings",
            "Verify domain authentication (SPF/DKIM)",
            "Test email delivery and bounce handling",
        ],
    },
    ServiceInfo {
        path: "/analytics",
        name: "Analytics & Reporting Service",
        description: "Provides business intelligence and metrics",
        connection_steps: &[
            "Start analytics data processing service",
            "Connect to analytics database (ClickHouse/BigQuery)",
            "Set up data pipeline and ETL processes",
            "Configure real-time dashboard updates",
        ],
    },
    ServiceInfo {
        path: "/wishlist",
        name: "Wishlist Service",
        description: "Manages user wishlists and favorites",
        connection_steps: &[
            "Start wishlist microservice",
            "Connect to user preferences database",
            "Verify user authentication integration",
            "Set up wishlist sharing functionality",
        ],
    },
    ServiceInfo {
        path: "/reviews",
        name: "Review & Rating Service",
        description: "Handles product reviews and ratings",
        connection_steps: &[
            "Launch review management service",
            "Connect to reviews database",
            "Set up content moderation system",
            "Configure review notification system",
        ],
    },
    ServiceInfo {
        path: "/coupons",
        name: "Coupon & Discount Service",
        description: "Manages promotional codes and discounts",
        connection_steps: &[
            "Start coupon validation service",
            "Connect to promotions database",
            "Set up usage tracking and limits",
            "Configure expiration and validation rules",
        ],
    },
];

/// Service reported when no entry matches.
pub static FALLBACK_SERVICE: ServiceInfo = ServiceInfo {
    path: "",
    name: "Backend API Service",
    description: "General backend service",
    connection_steps: &[
        "Ensure backend server is running",
        "Check network connectivity",
        "Verify API endpoint configuration",
        "Confirm service dependencies are available",
    ],
};

/// Find the service owning `path`.
#[must_use]
pub fn classify(path: &str) -> &'static ServiceInfo {
    SERVICES
        .iter()
        .find(|service| path.contains(service.path))
        .unwrap_or(&FALLBACK_SERVICE)
}
