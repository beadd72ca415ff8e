mod helpers;

mod catalog_test;
mod shopping_cart_test;
mod subscription_test;
mod token_test;
mod user_test;
