// Diesel table definitions matching migrations/.

diesel::table! {
    customer_details (id) {
        id -> BigInt,
        name -> Text,
        email -> Text,
        phone -> Text,
    }
}

diesel::table! {
    customer_address (id) {
        id -> BigInt,
        street -> Text,
        city -> Text,
        state -> Text,
        zip_code -> Text,
        country -> Text,
    }
}

diesel::table! {
    orders (id) {
        id -> BigInt,
        order_type -> Text,
        customer_id -> BigInt,
        address_id -> BigInt,
        total_amount -> Text,
        currency -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    order_items (id) {
        id -> BigInt,
        order_id -> BigInt,
        product_id -> BigInt,
        quantity -> Integer,
        price_per_unit -> Text,
        status -> Text,
    }
}

diesel::joinable!(order_items -> orders (order_id));
diesel::joinable!(orders -> customer_details (customer_id));
diesel::joinable!(orders -> customer_address (address_id));

diesel::allow_tables_to_appear_in_same_query!(
    customer_address,
    customer_details,
    order_items,
    orders,
);
