use core::{cmp::PartialEq, fmt::Debug};

use bytemuck::Pod;
use half::{bf16, f16};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    BFloat16,
    Float32,
    Float64,
}

impl DataType {
    /// Number of bytes one element of this type occupies in storage.
    pub fn byte_width(self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 => 1,
            DataType::Int16 | DataType::UInt16 | DataType::Float16 | DataType::BFloat16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => 8,
        }
    }

    /// Stable tag used when the type is persisted.
    pub fn code(self) -> u8 {
        match self {
            DataType::Int8 => 0,
            DataType::Int16 => 1,
            DataType::Int32 => 2,
            DataType::Int64 => 3,
            DataType::UInt8 => 4,
            DataType::UInt16 => 5,
            DataType::UInt32 => 6,
            DataType::UInt64 => 7,
            DataType::Float16 => 8,
            DataType::BFloat16 => 9,
            DataType::Float32 => 10,
            DataType::Float64 => 11,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        let data_type = match code {
            0 => DataType::Int8,
            1 => DataType::Int16,
            2 => DataType::Int32,
            3 => DataType::Int64,
            4 => DataType::UInt8,
            5 => DataType::UInt16,
            6 => DataType::UInt32,
            7 => DataType::UInt64,
            8 => DataType::Float16,
            9 => DataType::BFloat16,
            10 => DataType::Float32,
            11 => DataType::Float64,
            _ => return None,
        };
        Some(data_type)
    }
}

// Plain numeric element that can live in raw byte storage.
pub trait Num: Pod + Debug + PartialEq + Send + Sync {
    fn data_type() -> DataType;
}

macro_rules! impl_num {
    ($($t:ty => $dt:expr),* $(,)?) => {
        $(
            impl Num for $t {
                fn data_type() -> DataType {
                    $dt
                }
            }
        )*
    };
}

impl_num!(
    i8 => DataType::Int8,
    i16 => DataType::Int16,
    i32 => DataType::Int32,
    i64 => DataType::Int64,
    u8 => DataType::UInt8,
    u16 => DataType::UInt16,
    u32 => DataType::UInt32,
    u64 => DataType::UInt64,
    f16 => DataType::Float16,
    bf16 => DataType::BFloat16,
    f32 => DataType::Float32,
    f64 => DataType::Float64,
);
