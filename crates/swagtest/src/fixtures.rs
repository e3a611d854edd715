//! Static test data for the Swag Labs storefront.
//!
//! Every value here is byte-identical to what the site renders or accepts.
//! Tests import what they need explicitly:
//!
//! ```
//! use swagtest::fixtures::{messages, PRODUCTS, USERS};
//!
//! assert_eq!(USERS.standard.username, "standard_user");
//! assert_eq!(PRODUCTS.backpack.name, "Sauce Labs Backpack");
//! assert!(messages::INVALID_CREDENTIALS.starts_with("Epic sadface"));
//! ```

use serde::Serialize;

/// A login credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Credential {
    /// Role key (`standard`, `locked`, ...)
    pub role: &'static str,
    /// Username typed into the login form
    pub username: &'static str,
    /// Password typed into the login form
    pub password: &'static str,
}

/// Known users by role
#[derive(Debug, Clone, Copy)]
pub struct Users {
    /// `standard_user`, the happy path
    pub standard: Credential,
    /// `locked_out_user`, rejected at login
    pub locked: Credential,
    /// `problem_user`
    pub problem: Credential,
    /// `performance_glitch_user`
    pub performance: Credential,
    /// Credentials no account accepts
    pub invalid: Credential,
}

impl Users {
    /// All credentials, in declaration order
    #[must_use]
    pub const fn all(&self) -> [Credential; 5] {
        [
            self.standard,
            self.locked,
            self.problem,
            self.performance,
            self.invalid,
        ]
    }
}

const PASSWORD: &str = "secret_sauce";

/// User credentials
pub const USERS: Users = Users {
    standard: Credential {
        role: "standard",
        username: "standard_user",
        password: PASSWORD,
    },
    locked: Credential {
        role: "locked",
        username: "locked_out_user",
        password: PASSWORD,
    },
    problem: Credential {
        role: "problem",
        username: "problem_user",
        password: PASSWORD,
    },
    performance: Credential {
        role: "performance",
        username: "performance_glitch_user",
        password: PASSWORD,
    },
    invalid: Credential {
        role: "invalid",
        username: "invalid_user",
        password: "wrong_password",
    },
};

/// A catalog product as listed on the inventory screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Fixture key
    pub key: &'static str,
    /// Display name, exactly as rendered
    pub name: &'static str,
    /// Listed price in cents
    pub price_cents: u32,
    /// Suffix of the `add-to-cart-*` / `remove-*` test ids
    pub slug: &'static str,
}

/// Catalog products by key
#[derive(Debug, Clone, Copy)]
pub struct Products {
    /// Sauce Labs Backpack
    pub backpack: Product,
    /// Sauce Labs Bike Light
    pub bike_light: Product,
    /// Sauce Labs Bolt T-Shirt
    pub bolt_t_shirt: Product,
    /// Sauce Labs Fleece Jacket
    pub fleece_jacket: Product,
    /// Sauce Labs Onesie
    pub onesie: Product,
    /// Test.allTheThings() T-Shirt (Red)
    pub red_t_shirt: Product,
}

impl Products {
    /// All products in the site's default (name ascending) order
    #[must_use]
    pub const fn all(&self) -> [Product; 6] {
        [
            self.backpack,
            self.bike_light,
            self.bolt_t_shirt,
            self.fleece_jacket,
            self.onesie,
            self.red_t_shirt,
        ]
    }

    /// Look up a product by fixture key
    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<Product> {
        self.all().into_iter().find(|p| p.key == key)
    }
}

/// Product catalog
pub const PRODUCTS: Products = Products {
    backpack: Product {
        key: "backpack",
        name: "Sauce Labs Backpack",
        price_cents: 2999,
        slug: "sauce-labs-backpack",
    },
    bike_light: Product {
        key: "bike_light",
        name: "Sauce Labs Bike Light",
        price_cents: 999,
        slug: "sauce-labs-bike-light",
    },
    bolt_t_shirt: Product {
        key: "bolt_t_shirt",
        name: "Sauce Labs Bolt T-Shirt",
        price_cents: 1599,
        slug: "sauce-labs-bolt-t-shirt",
    },
    fleece_jacket: Product {
        key: "fleece_jacket",
        name: "Sauce Labs Fleece Jacket",
        price_cents: 4999,
        slug: "sauce-labs-fleece-jacket",
    },
    onesie: Product {
        key: "onesie",
        name: "Sauce Labs Onesie",
        price_cents: 799,
        slug: "sauce-labs-onesie",
    },
    red_t_shirt: Product {
        key: "red_t_shirt",
        name: "Test.allTheThings() T-Shirt (Red)",
        price_cents: 1599,
        slug: "test.allthethings()-t-shirt-(red)",
    },
};

/// Checkout customer information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// First Name field
    pub first_name: &'static str,
    /// Last Name field
    pub last_name: &'static str,
    /// Zip/Postal Code field
    pub postal_code: &'static str,
}

/// Customer variants, both accepted by checkout
#[derive(Debug, Clone, Copy)]
pub struct Customers {
    /// Plain ASCII details
    pub valid: Customer,
    /// Accented names and a UK postcode
    pub international: Customer,
}

/// Customer data
pub const CUSTOMERS: Customers = Customers {
    valid: Customer {
        first_name: "John",
        last_name: "Doe",
        postal_code: "12345",
    },
    international: Customer {
        first_name: "José",
        last_name: "García-López",
        postal_code: "SW1A 1AA",
    },
};

/// Expected on-screen strings
pub mod messages {
    /// Unknown username or wrong password
    pub const INVALID_CREDENTIALS: &str =
        "Epic sadface: Username and password do not match any user in this service";
    /// `locked_out_user` tried to sign in
    pub const LOCKED_OUT: &str = "Epic sadface: Sorry, this user has been locked out.";
    /// Login submitted with an empty username
    pub const USERNAME_REQUIRED: &str = "Epic sadface: Username is required";
    /// Login submitted with a username but no password
    pub const PASSWORD_REQUIRED: &str = "Epic sadface: Password is required";
    /// Prefix of the banner shown after an anonymous deep link
    pub const LOGIN_REQUIRED: &str = "Epic sadface: You can only access";

    /// Checkout information: first name missing (reported first)
    pub const FIRST_NAME_REQUIRED: &str = "Error: First Name is required";
    /// Checkout information: first name given, last name missing
    pub const LAST_NAME_REQUIRED: &str = "Error: Last Name is required";
    /// Checkout information: both names given, postal code missing
    pub const POSTAL_CODE_REQUIRED: &str = "Error: Postal Code is required";

    /// Header of the order confirmation
    pub const ORDER_COMPLETE_HEADER: &str = "Thank you for your order!";
    /// Body of the order confirmation
    pub const ORDER_COMPLETE_TEXT: &str =
        "Your order has been dispatched, and will arrive just as fast as the pony can get there!";

    /// Screen titles
    pub mod titles {
        /// Catalog
        pub const INVENTORY: &str = "Products";
        /// Cart
        pub const CART: &str = "Your Cart";
        /// Checkout step one
        pub const CHECKOUT_INFORMATION: &str = "Checkout: Your Information";
        /// Checkout step two
        pub const CHECKOUT_OVERVIEW: &str = "Checkout: Overview";
        /// Order placed
        pub const CHECKOUT_COMPLETE: &str = "Checkout: Complete!";
    }
}

/// Storefront paths
pub mod paths {
    /// Login form
    pub const LOGIN: &str = "/";
    /// Catalog
    pub const INVENTORY: &str = "/inventory.html";
    /// Cart
    pub const CART: &str = "/cart.html";
    /// Checkout step one
    pub const CHECKOUT_INFORMATION: &str = "/checkout-step-one.html";
    /// Checkout step two
    pub const CHECKOUT_OVERVIEW: &str = "/checkout-step-two.html";
    /// Order confirmation
    pub const CHECKOUT_COMPLETE: &str = "/checkout-complete.html";
}
