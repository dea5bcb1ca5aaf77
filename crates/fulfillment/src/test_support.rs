//! Order fixtures shared by unit tests.

#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use tgf_core::{CurrencyCode, Email, FflDealerId, OrderId, OrderItemId, Price, ReceiverType};

use crate::order::{Address, Customer, FflDealer, Order, OrderItem, PaymentResult};
use crate::order_number::{OrderNumber, receiver_type_for};

/// A non-FFL, drop-ship eligible accessory.
pub fn accessory(id: i32, unit_price: Decimal, quantity: u32) -> OrderItem {
    OrderItem {
        id: OrderItemId::new(id),
        name: format!("Accessory {id}"),
        sku: format!("SKU-{id}"),
        distributor_stock_number: format!("RSR{id:05}"),
        upc: Some(format!("0000000000{id:02}")),
        manufacturer: Some("Magpul".to_string()),
        category: Some("Magazines".to_string()),
        unit_price,
        quantity,
        requires_ffl: false,
        drop_ship_eligible: true,
        in_house_only: false,
        is_firearm: false,
    }
}

/// A handgun requiring FFL transfer.
pub fn firearm(id: i32, unit_price: Decimal, drop_ship: bool) -> OrderItem {
    OrderItem {
        id: OrderItemId::new(id),
        name: format!("Handgun {id}"),
        sku: format!("PA{id}5S203"),
        distributor_stock_number: format!("GLPA{id}5S203"),
        upc: None,
        manufacturer: Some("Glock".to_string()),
        category: Some("Handguns".to_string()),
        unit_price,
        quantity: 1,
        requires_ffl: true,
        drop_ship_eligible: drop_ship,
        in_house_only: false,
        is_firearm: true,
    }
}

/// Order number 1234 with the receiver type its items imply.
pub fn sample_order(items: Vec<OrderItem>, with_ffl: bool) -> Order {
    let mut order = Order {
        id: OrderId::new(1),
        order_number: OrderNumber::new(1234, ReceiverType::Individual).unwrap(),
        customer: Customer {
            email: Email::parse("dana.reyes@example.com").unwrap(),
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            phone: Some("512-555-0142".to_string()),
            company: None,
        },
        items,
        shipping_address: Address {
            name: "Dana Reyes".to_string(),
            address1: "100 Congress Ave".to_string(),
            address2: None,
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip_code: "78701".to_string(),
        },
        billing_address: Address::default(),
        ffl_dealer: with_ffl.then(|| FflDealer {
            id: FflDealerId::new(88),
            business_name: "Lone Star Arms LLC".to_string(),
            license_number: "5-74-453-01-2A-12345".to_string(),
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
        }),
        payment: PaymentResult {
            amount: Price::usd_cents(0),
            authorization_code: "AUTH01".to_string(),
            transaction_id: "60012345678".to_string(),
            approved: true,
        },
        created_at: Utc.with_ymd_and_hms(2025, 6, 2, 15, 0, 0).unwrap(),
    };
    order.order_number = OrderNumber::new(1234, receiver_type_for(&order)).unwrap();
    order.payment.amount = Price::new(order.total().unwrap(), CurrencyCode::USD);
    order
}
