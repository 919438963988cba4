pub use crate::{enc::*, nets::*, types::*};

pub use cashcoins_core::prelude::*;

#[cfg(any(feature = "mainnet", feature = "testnet", feature = "regtest"))]
pub use crate::defaults::*;
