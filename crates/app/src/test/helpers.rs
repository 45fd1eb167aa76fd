//! Test Helpers

use storefront::{
    faqs::FaqCategory,
    identity::Identity,
    tickets::{TicketPriority, TicketSubject},
};

use crate::{
    domain::{
        contact::data::NewContactMessage,
        faqs::{
            FaqsService, FaqsServiceError,
            data::NewFaq,
            records::{FaqRecord, FaqUuid},
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        tickets::{TicketsService, TicketsServiceError, data::NewTicket, records::TicketRecord},
        users::{
            UsersService, UsersServiceError,
            data::NewUser,
            records::{UserRecord, UserUuid},
        },
    },
    test::TestContext,
};

pub(crate) fn new_user(username: &str) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: "Rahim".to_string(),
        last_name: "Uddin".to_string(),
        mobile_no: "01700000000".to_string(),
        bio: None,
    }
}

pub(crate) async fn create_user(
    ctx: &TestContext,
    username: &str,
) -> Result<UserRecord, UsersServiceError> {
    ctx.users.create_user(new_user(username)).await
}

pub(crate) fn new_product(sku: i64, price: Option<u64>) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: format!("Product {sku}"),
        price,
        category: Some("grocery".to_string()),
        short_description: "Test product".to_string(),
        brief_description: String::new(),
        brand: "Rannaghor".to_string(),
        sku,
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    sku: i64,
    price: Option<u64>,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products.create_product(new_product(sku, price)).await
}

pub(crate) fn new_ticket() -> NewTicket {
    NewTicket {
        name: "Nadia Islam".to_string(),
        email: "nadia@example.com".to_string(),
        phone: Some("01800000000".to_string()),
        order_number: Some("RP-0001".to_string()),
        subject: TicketSubject::Delivery,
        message: "My order has not arrived.".to_string(),
        priority: TicketPriority::default(),
    }
}

/// Open a ticket as an anonymous customer.
pub(crate) async fn open_ticket(ctx: &TestContext) -> Result<TicketRecord, TicketsServiceError> {
    ctx.tickets
        .create_ticket(Identity::Anonymous, new_ticket())
        .await
}

pub(crate) fn new_faq(category: FaqCategory, display_order: i32) -> NewFaq {
    NewFaq {
        uuid: FaqUuid::new(),
        category,
        question: format!("{} question {display_order}?", category.label()),
        answer: "Yes.".to_string(),
        display_order,
        is_active: true,
    }
}

pub(crate) async fn create_faq(
    ctx: &TestContext,
    category: FaqCategory,
    display_order: i32,
) -> Result<FaqRecord, FaqsServiceError> {
    ctx.faqs
        .create_faq(new_faq(category, display_order))
        .await
}

pub(crate) fn new_contact_message(subject: &str) -> NewContactMessage {
    NewContactMessage {
        name: "Karim Ahmed".to_string(),
        email: "karim@example.com".to_string(),
        phone: None,
        subject: subject.to_string(),
        message: "Please call me back.".to_string(),
    }
}
