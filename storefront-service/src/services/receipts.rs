//! Plain-text receipts and order-verification QR codes.
//!
//! Page layout for printable/PDF output is left to the caller; this module
//! produces the receipt body and the QR image payload.

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, Luma};
use qrcode::QrCode;
use rust_decimal::Decimal;
use serde_json::json;
use std::io::Cursor;
use storefront_core::error::AppError;

use crate::models::{AdditionalCharge, LineItem, Order};

/// Business identity printed in the receipt header.
#[derive(Debug, Clone)]
pub struct BusinessInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
}

pub struct ReceiptData<'a> {
    pub order: &'a Order,
    pub items: &'a [LineItem],
    pub charges: &'a [AdditionalCharge],
    pub business: &'a BusinessInfo,
}

fn money(amount: Decimal) -> String {
    format!("KSh {:.2}", amount)
}

/// Render a fixed-width text receipt for an order.
pub fn generate_receipt_text(data: &ReceiptData) -> String {
    let ReceiptData {
        order,
        items,
        charges,
        business,
    } = data;

    let mut receipt = String::new();

    // Header
    receipt.push_str(&format!("{}\n", business.name));
    receipt.push_str(&format!("{}\n", business.address));
    receipt.push_str(&format!("Phone: {}\n", business.phone));
    if let Some(email) = &business.email {
        receipt.push_str(&format!("Email: {}\n", email));
    }
    receipt.push('\n');

    // Order info
    receipt.push_str("RECEIPT\n");
    receipt.push_str(&format!("Order #: {}\n", order.id));
    receipt.push_str(&format!(
        "Date: {}\n",
        order.created_at.format("%Y-%m-%d %H:%M:%S")
    ));
    receipt.push_str(&format!("Customer: {}\n", order.customer_name));
    receipt.push_str(&format!("Phone: {}\n", order.customer_phone));
    receipt.push('\n');

    // Items
    receipt.push_str("ITEMS:\n");
    receipt.push_str(&format!(
        "{:<20} {:<5} {:<10} {:>10}\n",
        "Item", "Qty", "Price", "Total"
    ));
    receipt.push_str(&format!("{}\n", "-".repeat(48)));

    for item in items.iter() {
        // Truncate on char boundaries; names are not always ASCII.
        let name = if item.product_name.chars().count() > 18 {
            let prefix: String = item.product_name.chars().take(18).collect();
            format!("{}..", prefix)
        } else {
            item.product_name.clone()
        };
        receipt.push_str(&format!(
            "{:<20} {:<5} {:<10} {:>10}\n",
            name,
            item.quantity,
            money(item.unit_price),
            money(item.total_price)
        ));
    }

    receipt.push_str(&format!("{}\n", "-".repeat(48)));

    // Totals
    let subtotal: Decimal = items.iter().map(|item| item.total_price).sum();
    receipt.push_str(&format!("{:<37} {:>10}\n", "Subtotal:", money(subtotal)));

    if !charges.is_empty() {
        for charge in charges.iter() {
            receipt.push_str(&format!(
                "{:<37} {:>10}\n",
                format!("{}:", charge.name),
                money(charge.amount)
            ));
        }
        let charges_total: Decimal = charges.iter().map(|charge| charge.amount).sum();
        receipt.push_str(&format!(
            "{:<37} {:>10}\n",
            "Charges:",
            money(charges_total)
        ));
    }

    receipt.push_str(&format!(
        "{:<37} {:>10}\n",
        "TOTAL:",
        money(order.total_amount)
    ));
    receipt.push('\n');

    // Payment info
    let payment_method = order
        .payment_method
        .as_deref()
        .map(|m| m.replace('_', " ").to_uppercase())
        .unwrap_or_else(|| "N/A".to_string());
    receipt.push_str(&format!("Payment Method: {}\n", payment_method));
    receipt.push_str(&format!(
        "Payment Status: {}\n",
        order.payment_status.to_uppercase()
    ));
    receipt.push('\n');

    // Delivery info
    receipt.push_str("DELIVERY ADDRESS:\n");
    receipt.push_str(&format!("{}\n", order.delivery_address));
    receipt.push('\n');

    if let Some(notes) = &order.notes {
        receipt.push_str("SPECIAL INSTRUCTIONS:\n");
        receipt.push_str(&format!("{}\n", notes));
        receipt.push('\n');
    }

    // Footer
    receipt.push_str("Thank you for your business!\n");
    receipt.push_str(&format!(
        "Order Status: {}\n",
        order.status.replace('_', " ").to_uppercase()
    ));

    receipt
}

/// JSON payload embedded in the verification QR code.
pub fn receipt_qr_payload(order: &Order) -> String {
    json!({
        "order_id": order.id,
        "total": order.total_amount,
        "status": order.status,
    })
    .to_string()
}

/// Generate a QR code as base64-encoded PNG image.
pub fn generate_qr_base64(data: &str) -> Result<String, AppError> {
    let code = QrCode::new(data)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to build QR code: {}", e)))?;
    let image = code.render::<Luma<u8>>().build();

    let dynamic_image = DynamicImage::ImageLuma8(image);
    let mut buffer = Cursor::new(Vec::new());
    dynamic_image
        .write_to(&mut buffer, image::ImageOutputFormat::Png)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to encode QR PNG: {}", e)))?;

    Ok(general_purpose::STANDARD.encode(buffer.get_ref()))
}
