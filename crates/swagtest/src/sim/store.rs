//! Storefront state machine and screen rendering.
//!
//! Renders the Swag Labs screens with the site's own ids, classes,
//! `data-test` values and copy. State lives here and nowhere else: the cart,
//! the signed-in user, the open form values and the current route.

use super::dom::{Action, Element, Field};

const PASSWORD: &str = "secret_sauce";

/// Users the storefront accepts with [`PASSWORD`]
const ACCEPTED_USERS: &[&str] = &[
    "standard_user",
    "locked_out_user",
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

const LOCKED_OUT: &str = "locked_out_user";

/// One catalog entry as the site lists it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    /// Numeric id in `inventory-item.html?id=`
    pub id: u32,
    /// Display name
    pub name: &'static str,
    /// Listing description
    pub description: &'static str,
    /// Price in cents
    pub price_cents: u32,
}

impl CatalogItem {
    /// Slug used in `add-to-cart-<slug>` / `remove-<slug>`
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "-")
    }
}

/// Catalog in the site's default (name ascending) order
pub const CATALOG: &[CatalogItem] = &[
    CatalogItem {
        id: 4,
        name: "Sauce Labs Backpack",
        description: "carry.allTheThings() with the sleek, streamlined Sly Pack that melds uncompromising style with unequaled laptop and tablet protection.",
        price_cents: 2999,
    },
    CatalogItem {
        id: 0,
        name: "Sauce Labs Bike Light",
        description: "A red light isn't the desired state in testing but it sure helps when riding your bike at night. Water-resistant with 3 lighting modes, 1 AAA battery included.",
        price_cents: 999,
    },
    CatalogItem {
        id: 1,
        name: "Sauce Labs Bolt T-Shirt",
        description: "Get your testing superhero on with the Sauce Labs bolt T-shirt. From American Apparel, 100% ringspun combed cotton, heather gray with red bolt.",
        price_cents: 1599,
    },
    CatalogItem {
        id: 5,
        name: "Sauce Labs Fleece Jacket",
        description: "It's not every day that you come across a midweight quarter-zip fleece jacket capable of handling everything from a relaxing day outdoors to a busy day at the office.",
        price_cents: 4999,
    },
    CatalogItem {
        id: 2,
        name: "Sauce Labs Onesie",
        description: "Rib snap infant onesie for the junior automation engineer in development. Reinforced 3-snap bottom closure, two-needle hemmed sleeved and bottom won't unravel.",
        price_cents: 799,
    },
    CatalogItem {
        id: 3,
        name: "Test.allTheThings() T-Shirt (Red)",
        description: "This classic Sauce Labs t-shirt is perfect to wear when cozying up to your keyboard to automate a few tests. Super-soft and comfy ringspun combed cotton.",
        price_cents: 1599,
    },
];

fn catalog_item(id: u32) -> Option<&'static CatalogItem> {
    CATALOG.iter().find(|item| item.id == id)
}

/// Screens the storefront can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Inventory,
    Cart,
    CheckoutInformation,
    CheckoutOverview,
    CheckoutComplete,
    NotFound,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path {
            "" | "/" | "/index.html" => Self::Login,
            "/inventory.html" => Self::Inventory,
            "/cart.html" => Self::Cart,
            "/checkout-step-one.html" => Self::CheckoutInformation,
            "/checkout-step-two.html" => Self::CheckoutOverview,
            "/checkout-complete.html" => Self::CheckoutComplete,
            _ => Self::NotFound,
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Inventory => "/inventory.html",
            Self::Cart => "/cart.html",
            Self::CheckoutInformation => "/checkout-step-one.html",
            Self::CheckoutOverview => "/checkout-step-two.html",
            Self::CheckoutComplete => "/checkout-complete.html",
            Self::NotFound => "/404",
        }
    }

    const fn requires_login(self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }
}

/// Product ordering offered by the sort dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sort {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl Sort {
    const ALL: [(Self, &'static str, &'static str); 4] = [
        (Self::NameAsc, "az", "Name (A to Z)"),
        (Self::NameDesc, "za", "Name (Z to A)"),
        (Self::PriceAsc, "lohi", "Price (low to high)"),
        (Self::PriceDesc, "hilo", "Price (high to low)"),
    ];

    fn from_value(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(_, v, _)| *v == value)
            .map(|(sort, _, _)| *sort)
    }

    fn value(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(sort, _, _)| *sort == self)
            .map_or("az", |(_, v, _)| v)
    }

    fn apply(self, items: &mut [&CatalogItem]) {
        match self {
            Self::NameAsc => items.sort_by(|a, b| a.name.cmp(b.name)),
            Self::NameDesc => items.sort_by(|a, b| b.name.cmp(a.name)),
            Self::PriceAsc => items.sort_by_key(|item| item.price_cents),
            Self::PriceDesc => items.sort_by(|a, b| b.price_cents.cmp(&a.price_cents)),
        }
    }
}

/// Why an interaction was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The control is not a form field
    NotEditable,
    /// The control is not a `<select>` or lacks the option
    NoSuchOption(String),
}

/// Format cents as the site prints prices
pub fn dollars(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Sales tax the overview charges: 8%, rounded half-up to the cent
pub const fn tax_cents(subtotal_cents: u32) -> u32 {
    (subtotal_cents * 8 + 50) / 100
}

/// In-memory storefront
#[derive(Debug, Clone)]
pub struct Storefront {
    route: Route,
    user: Option<String>,
    cart: Vec<u32>,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    postal_code: String,
    error: Option<String>,
    menu_open: bool,
    sort: Sort,
}

impl Default for Storefront {
    fn default() -> Self {
        Self {
            route: Route::Login,
            user: None,
            cart: Vec::new(),
            username: String::new(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            postal_code: String::new(),
            error: None,
            menu_open: false,
            sort: Sort::NameAsc,
        }
    }
}

impl Storefront {
    pub const fn route(&self) -> Route {
        self.route
    }

    /// Load a path, bouncing anonymous visitors of protected screens to login
    pub fn visit(&mut self, path: &str) {
        let route = Route::from_path(path);
        self.menu_open = false;
        if route.requires_login() && self.user.is_none() {
            self.show(Route::Login);
            self.error = Some(format!(
                "Epic sadface: You can only access '{}' when you are logged in.",
                route.path()
            ));
            return;
        }
        self.show(route);
    }

    fn show(&mut self, route: Route) {
        if route != self.route {
            self.error = None;
            if route == Route::CheckoutInformation {
                self.first_name.clear();
                self.last_name.clear();
                self.postal_code.clear();
            }
            if route == Route::Login {
                self.username.clear();
                self.password.clear();
            }
        }
        self.menu_open = false;
        self.route = route;
    }

    pub fn fill(&mut self, field: Field, value: &str) -> Result<(), Rejection> {
        let slot = match field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::PostalCode => &mut self.postal_code,
            Field::Sort => return Err(Rejection::NotEditable),
        };
        value.clone_into(slot);
        Ok(())
    }

    pub fn select(&mut self, field: Field, value: &str) -> Result<(), Rejection> {
        if field != Field::Sort {
            return Err(Rejection::NotEditable);
        }
        self.sort = Sort::from_value(value).ok_or_else(|| Rejection::NoSuchOption(value.to_string()))?;
        Ok(())
    }

    pub fn click(&mut self, action: &Action) {
        match action {
            Action::Login => self.submit_login(),
            Action::DismissError => self.error = None,
            Action::AddToCart(id) => {
                if !self.cart.contains(id) {
                    self.cart.push(*id);
                }
            }
            Action::RemoveFromCart(id) => self.cart.retain(|c| c != id),
            Action::OpenCart => self.show(Route::Cart),
            Action::Checkout => self.show(Route::CheckoutInformation),
            Action::ContinueShopping | Action::BackToProducts | Action::AllItems => {
                self.show(Route::Inventory);
            }
            Action::ContinueCheckout => self.submit_information(),
            Action::CancelCheckout => match self.route {
                Route::CheckoutInformation => self.show(Route::Cart),
                _ => self.show(Route::Inventory),
            },
            Action::Finish => {
                self.cart.clear();
                self.show(Route::CheckoutComplete);
            }
            Action::OpenMenu => self.menu_open = true,
            Action::CloseMenu => self.menu_open = false,
            Action::Logout => {
                self.user = None;
                self.show(Route::Login);
            }
            Action::ResetAppState => {
                self.cart.clear();
                self.sort = Sort::NameAsc;
            }
        }
    }

    fn submit_login(&mut self) {
        let error = if self.username.is_empty() {
            Some("Epic sadface: Username is required")
        } else if self.password.is_empty() {
            Some("Epic sadface: Password is required")
        } else if !ACCEPTED_USERS.contains(&self.username.as_str()) || self.password != PASSWORD {
            Some("Epic sadface: Username and password do not match any user in this service")
        } else if self.username == LOCKED_OUT {
            Some("Epic sadface: Sorry, this user has been locked out.")
        } else {
            None
        };
        match error {
            Some(message) => self.error = Some(message.to_string()),
            None => {
                self.user = Some(self.username.clone());
                self.show(Route::Inventory);
            }
        }
    }

    fn submit_information(&mut self) {
        let error = if self.first_name.is_empty() {
            Some("Error: First Name is required")
        } else if self.last_name.is_empty() {
            Some("Error: Last Name is required")
        } else if self.postal_code.is_empty() {
            Some("Error: Postal Code is required")
        } else {
            None
        };
        match error {
            Some(message) => self.error = Some(message.to_string()),
            None => self.show(Route::CheckoutOverview),
        }
    }

    fn cart_items(&self) -> impl Iterator<Item = &'static CatalogItem> + '_ {
        self.cart.iter().filter_map(|id| catalog_item(*id))
    }

    /// Render the current screen as an element tree rooted at `<html>`
    pub fn render(&self) -> Element {
        let body = match self.route {
            Route::Login => self.render_login(),
            Route::NotFound => Element::new("h1").text("404"),
            route => {
                let content = match route {
                    Route::Inventory => self.render_inventory(),
                    Route::Cart => self.render_cart(),
                    Route::CheckoutInformation => self.render_information(),
                    Route::CheckoutOverview => self.render_overview(),
                    _ => Self::render_complete(),
                };
                Element::new("div")
                    .id("page_wrapper")
                    .class("page_wrapper")
                    .child(self.render_header(route))
                    .child(content)
            }
        };
        Element::new("html").child(Element::new("body").child(body))
    }

    fn render_error(&self) -> Element {
        let container = Element::new("div").class("error-message-container");
        match &self.error {
            Some(message) => container.class("error").child(
                Element::new("h3").test_id("error").text(message.clone()).child(
                    Element::new("button")
                        .class("error-button")
                        .test_id("error-button")
                        .on_click(Action::DismissError),
                ),
            ),
            None => container,
        }
    }

    fn render_login(&self) -> Element {
        Element::new("div").class("login_container").children([
            Element::new("div").class("login_logo").text("Swag Labs"),
            Element::new("div").class("login_wrapper").child(
                Element::new("form").children([
                    input("user-name", "username", "Username", &self.username)
                        .attr("name", "user-name")
                        .bind(Field::Username),
                    input("password", "password", "Password", &self.password)
                        .attr("type", "password")
                        .bind(Field::Password),
                    self.render_error(),
                    Element::new("input")
                        .id("login-button")
                        .class("submit-button btn_action")
                        .test_id("login-button")
                        .attr("type", "submit")
                        .value("Login")
                        .on_click(Action::Login),
                ]),
            ),
            Element::new("div").class("login_credentials_wrap").child(
                Element::new("div")
                    .id("login_credentials")
                    .class("login_credentials")
                    .test_id("login-credentials")
                    .child(Element::new("h4").text("Accepted usernames are:"))
                    .children(ACCEPTED_USERS.iter().map(|u| Element::new("div").text(*u))),
            ),
        ])
    }

    fn render_header(&self, route: Route) -> Element {
        let count = self.cart.len();
        let mut cart_link = Element::new("a")
            .class("shopping_cart_link")
            .test_id("shopping-cart-link")
            .on_click(Action::OpenCart);
        if count > 0 {
            cart_link = cart_link.child(
                Element::new("span")
                    .class("shopping_cart_badge")
                    .test_id("shopping-cart-badge")
                    .text(count.to_string()),
            );
        }

        let menu_link = |id: &str, test_id: &str, text: &str, action: Action| {
            Element::new("a")
                .id(id)
                .class("bm-item menu-item")
                .test_id(test_id)
                .text(text)
                .on_click(action)
        };
        let menu = Element::new("div")
            .class("bm-menu-wrap")
            .hidden_if(!self.menu_open)
            .child(
                Element::new("nav").class("bm-item-list").children([
                    menu_link("inventory_sidebar_link", "inventory-sidebar-link", "All Items", Action::AllItems),
                    Element::new("a")
                        .id("about_sidebar_link")
                        .class("bm-item menu-item")
                        .test_id("about-sidebar-link")
                        .attr("href", "https://saucelabs.com/")
                        .text("About"),
                    menu_link("logout_sidebar_link", "logout-sidebar-link", "Logout", Action::Logout),
                    menu_link("reset_sidebar_link", "reset-sidebar-link", "Reset App State", Action::ResetAppState),
                ]),
            )
            .child(
                Element::new("button")
                    .id("react-burger-cross-btn")
                    .text("Close Menu")
                    .on_click(Action::CloseMenu),
            );

        let (title, extra) = match route {
            Route::Inventory => ("Products", Some(self.render_sort())),
            Route::Cart => ("Your Cart", None),
            Route::CheckoutInformation => ("Checkout: Your Information", None),
            Route::CheckoutOverview => ("Checkout: Overview", None),
            _ => ("Checkout: Complete!", None),
        };
        let mut secondary = Element::new("div")
            .class("header_secondary_container")
            .test_id("secondary-header")
            .child(Element::new("span").class("title").test_id("title").text(title));
        if let Some(extra) = extra {
            secondary = secondary.child(extra);
        }

        Element::new("div")
            .id("header_container")
            .class("header_container")
            .test_id("header-container")
            .child(
                Element::new("div")
                    .class("primary_header")
                    .test_id("primary-header")
                    .children([
                        Element::new("div").id("menu_button_container").children([
                            Element::new("button")
                                .id("react-burger-menu-btn")
                                .text("Open Menu")
                                .on_click(Action::OpenMenu),
                            menu,
                        ]),
                        Element::new("div").class("app_logo").text("Swag Labs"),
                        Element::new("div")
                            .id("shopping_cart_container")
                            .class("shopping_cart_container")
                            .child(cart_link),
                    ]),
            )
            .child(secondary)
    }

    fn render_sort(&self) -> Element {
        Element::new("span").class("select_container").child(
            Element::new("select")
                .class("product_sort_container")
                .test_id("product-sort-container")
                .value(self.sort.value())
                .bind(Field::Sort)
                .children(
                    Sort::ALL
                        .iter()
                        .map(|(_, value, label)| Element::new("option").attr("value", *value).text(*label)),
                ),
        )
    }

    fn render_inventory(&self) -> Element {
        let mut items: Vec<&CatalogItem> = CATALOG.iter().collect();
        self.sort.apply(&mut items);
        let rows = items.into_iter().map(|item| {
            let in_cart = self.cart.contains(&item.id);
            let slug = item.slug();
            let button = if in_cart {
                Element::new("button")
                    .id(format!("remove-{slug}"))
                    .class("btn btn_secondary btn_small btn_inventory")
                    .test_id(format!("remove-{slug}"))
                    .text("Remove")
                    .on_click(Action::RemoveFromCart(item.id))
            } else {
                Element::new("button")
                    .id(format!("add-to-cart-{slug}"))
                    .class("btn btn_primary btn_small btn_inventory")
                    .test_id(format!("add-to-cart-{slug}"))
                    .text("Add to cart")
                    .on_click(Action::AddToCart(item.id))
            };
            Element::new("div")
                .class("inventory_item")
                .test_id("inventory-item")
                .child(
                    Element::new("div")
                        .class("inventory_item_description")
                        .test_id("inventory-item-description")
                        .children([
                            Element::new("div").class("inventory_item_label").children([
                                Element::new("a").id(format!("item_{}_title_link", item.id)).child(
                                    Element::new("div")
                                        .class("inventory_item_name")
                                        .test_id("inventory-item-name")
                                        .text(item.name),
                                ),
                                Element::new("div")
                                    .class("inventory_item_desc")
                                    .test_id("inventory-item-desc")
                                    .text(item.description),
                            ]),
                            Element::new("div").class("pricebar").children([
                                Element::new("div")
                                    .class("inventory_item_price")
                                    .test_id("inventory-item-price")
                                    .text(dollars(item.price_cents)),
                                button,
                            ]),
                        ]),
                )
        });
        Element::new("div")
            .id("inventory_container")
            .class("inventory_container")
            .child(
                Element::new("div")
                    .class("inventory_list")
                    .test_id("inventory-list")
                    .children(rows),
            )
    }

    fn cart_rows(&self, removable: bool) -> Vec<Element> {
        self.cart_items()
            .map(|item| {
                let mut pricebar = Element::new("div").class("item_pricebar").child(
                    Element::new("div")
                        .class("inventory_item_price")
                        .test_id("inventory-item-price")
                        .text(dollars(item.price_cents)),
                );
                if removable {
                    let slug = item.slug();
                    pricebar = pricebar.child(
                        Element::new("button")
                            .id(format!("remove-{slug}"))
                            .class("btn btn_secondary btn_small cart_button")
                            .test_id(format!("remove-{slug}"))
                            .text("Remove")
                            .on_click(Action::RemoveFromCart(item.id)),
                    );
                }
                Element::new("div")
                    .class("cart_item")
                    .test_id("inventory-item")
                    .children([
                        Element::new("div")
                            .class("cart_quantity")
                            .test_id("item-quantity")
                            .text("1"),
                        Element::new("div").class("cart_item_label").children([
                            Element::new("a").id(format!("item_{}_title_link", item.id)).child(
                                Element::new("div")
                                    .class("inventory_item_name")
                                    .test_id("inventory-item-name")
                                    .text(item.name),
                            ),
                            Element::new("div")
                                .class("inventory_item_desc")
                                .test_id("inventory-item-desc")
                                .text(item.description),
                            pricebar,
                        ]),
                    ])
            })
            .collect()
    }

    fn render_cart(&self) -> Element {
        Element::new("div")
            .id("cart_contents_container")
            .class("cart_contents_container")
            .child(
                Element::new("div")
                    .class("cart_list")
                    .test_id("cart-list")
                    .child(Element::new("div").class("cart_quantity_label").text("QTY"))
                    .child(Element::new("div").class("cart_desc_label").text("Description"))
                    .children(self.cart_rows(true)),
            )
            .child(Element::new("div").class("cart_footer").children([
                Element::new("button")
                    .id("continue-shopping")
                    .class("btn btn_secondary back btn_medium")
                    .test_id("continue-shopping")
                    .text("Continue Shopping")
                    .on_click(Action::ContinueShopping),
                Element::new("button")
                    .id("checkout")
                    .class("btn btn_action btn_medium checkout_button")
                    .test_id("checkout")
                    .text("Checkout")
                    .on_click(Action::Checkout),
            ]))
    }

    fn render_information(&self) -> Element {
        Element::new("div")
            .id("checkout_info_container")
            .class("checkout_info_container")
            .child(
                Element::new("form")
                    .child(Element::new("div").class("checkout_info").children([
                        input("first-name", "firstName", "First Name", &self.first_name)
                            .bind(Field::FirstName),
                        input("last-name", "lastName", "Last Name", &self.last_name)
                            .bind(Field::LastName),
                        input("postal-code", "postalCode", "Zip/Postal Code", &self.postal_code)
                            .bind(Field::PostalCode),
                        self.render_error(),
                    ]))
                    .child(Element::new("div").class("checkout_buttons").children([
                        Element::new("button")
                            .id("cancel")
                            .class("btn btn_secondary back btn_medium cart_cancel_link")
                            .test_id("cancel")
                            .text("Cancel")
                            .on_click(Action::CancelCheckout),
                        Element::new("input")
                            .id("continue")
                            .class("submit-button btn btn_primary cart_button btn_action")
                            .test_id("continue")
                            .attr("type", "submit")
                            .value("Continue")
                            .on_click(Action::ContinueCheckout),
                    ])),
            )
    }

    fn render_overview(&self) -> Element {
        let subtotal: u32 = self.cart_items().map(|item| item.price_cents).sum();
        let tax = tax_cents(subtotal);
        let label = |class: &str, test_id: &str, text: String| {
            Element::new("div").class(class).test_id(test_id).text(text)
        };
        Element::new("div")
            .id("checkout_summary_container")
            .class("checkout_summary_container")
            .child(
                Element::new("div")
                    .class("cart_list")
                    .test_id("cart-list")
                    .children(self.cart_rows(false)),
            )
            .child(Element::new("div").class("summary_info").children([
                label("summary_info_label", "payment-info-label", "Payment Information:".into()),
                label("summary_value_label", "payment-info-value", "SauceCard #31337".into()),
                label("summary_info_label", "shipping-info-label", "Shipping Information:".into()),
                label("summary_value_label", "shipping-info-value", "Free Pony Express Delivery!".into()),
                label("summary_info_label", "total-info-label", "Price Total".into()),
                label(
                    "summary_subtotal_label",
                    "subtotal-label",
                    format!("Item total: {}", dollars(subtotal)),
                ),
                label("summary_tax_label", "tax-label", format!("Tax: {}", dollars(tax))),
                label(
                    "summary_total_label",
                    "total-label",
                    format!("Total: {}", dollars(subtotal + tax)),
                ),
                Element::new("div").class("cart_footer").children([
                    Element::new("button")
                        .id("cancel")
                        .class("btn btn_secondary back btn_medium cart_cancel_link")
                        .test_id("cancel")
                        .text("Cancel")
                        .on_click(Action::CancelCheckout),
                    Element::new("button")
                        .id("finish")
                        .class("btn btn_action btn_medium cart_button")
                        .test_id("finish")
                        .text("Finish")
                        .on_click(Action::Finish),
                ]),
            ]))
    }

    fn render_complete() -> Element {
        Element::new("div")
            .id("checkout_complete_container")
            .class("checkout_complete_container")
            .test_id("checkout-complete-container")
            .children([
                Element::new("img").class("pony_express").test_id("pony-express"),
                Element::new("h2")
                    .class("complete-header")
                    .test_id("complete-header")
                    .text("Thank you for your order!"),
                Element::new("div")
                    .class("complete-text")
                    .test_id("complete-text")
                    .text("Your order has been dispatched, and will arrive just as fast as the pony can get there!"),
                Element::new("button")
                    .id("back-to-products")
                    .class("btn btn_primary btn_small")
                    .test_id("back-to-products")
                    .text("Back Home")
                    .on_click(Action::BackToProducts),
            ])
    }
}

fn input(id: &str, test_id: &str, placeholder: &str, value: &str) -> Element {
    Element::new("input")
        .id(id)
        .class("input_error form_input")
        .test_id(test_id)
        .attr("placeholder", placeholder)
        .attr("type", "text")
        .value(value)
}
