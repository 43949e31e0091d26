//! Third-party services: the payment gateway and the remote image host.
//!
//! Both sit behind traits ([`PaymentGateway`] here, `MediaStore` in
//! `campus-core`) so handlers never touch `reqwest` directly.

pub mod cashfree;
pub mod cloudinary;
pub mod payments;

pub use cashfree::CashfreeGateway;
pub use cloudinary::CloudinaryStore;
pub use payments::{
    CustomerDetails, GatewayError, GatewayOrder, OrderRequest, PaymentGateway, generate_order_id,
    payment_hash,
};
