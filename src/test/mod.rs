//! Shared test support.

mod helpers;

pub(crate) use context::TestContext;
pub(crate) use helpers::{
    GatedGateway, RecordingNotifier, cod_form, placed_order, product, transport_error,
};
