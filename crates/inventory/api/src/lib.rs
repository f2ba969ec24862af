pub mod auth;
pub mod error;
pub mod product;
pub mod validation;

use std::{fmt, hash::Hash};

use serde::{de::DeserializeOwned, Serialize};

pub trait BaseModel
where
    Self: Serialize + DeserializeOwned,
{
    type Id: Copy + fmt::Debug + fmt::Display + Eq + Ord + Hash + Serialize + DeserializeOwned;

    type Price: Copy + fmt::Debug + Eq + Ord + Serialize + DeserializeOwned;

    type Count: Copy + fmt::Debug + Eq + Ord + Serialize + DeserializeOwned;
}
