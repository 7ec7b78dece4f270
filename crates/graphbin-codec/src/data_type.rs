//! Wire type codes.
//!
//! Every fully-qualified value starts with one of these codes. Two codes are
//! reserved: [`DataType::Custom`] hands dispatch over to a type name that
//! follows on the wire, and [`DataType::UnspecifiedNull`] marks a null with no
//! known type. Neither can be bound to a built-in serializer.

use std::fmt;

macro_rules! data_types {
    ($($(#[$doc:meta])* $variant:ident = $code:literal => $name:literal,)+) => {
        /// A GraphBinary type code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum DataType {
            $($(#[$doc])* $variant = $code,)+
        }

        impl DataType {
            /// Every known data type, in code order.
            pub const ALL: &'static [DataType] = &[$(DataType::$variant,)+];

            /// Look up a data type by its wire code.
            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some(DataType::$variant),)+
                    _ => None,
                }
            }

            /// Human-readable name.
            pub fn name(self) -> &'static str {
                match self {
                    $(DataType::$variant => $name,)+
                }
            }
        }
    };
}

data_types! {
    /// Name-dispatched host type.
    Custom = 0x00 => "CUSTOM",
    Int = 0x01 => "INT",
    Long = 0x02 => "LONG",
    String = 0x03 => "STRING",
    Date = 0x04 => "DATE",
    Timestamp = 0x05 => "TIMESTAMP",
    Class = 0x06 => "CLASS",
    Double = 0x07 => "DOUBLE",
    Float = 0x08 => "FLOAT",
    List = 0x09 => "LIST",
    Map = 0x0A => "MAP",
    Set = 0x0B => "SET",
    Uuid = 0x0C => "UUID",
    Edge = 0x0D => "EDGE",
    Path = 0x0E => "PATH",
    Property = 0x0F => "PROPERTY",
    Graph = 0x10 => "GRAPH",
    Vertex = 0x11 => "VERTEX",
    VertexProperty = 0x12 => "VERTEXPROPERTY",
    Barrier = 0x13 => "BARRIER",
    /// Variable binding: a bare string key and a fully-qualified value.
    Binding = 0x14 => "BINDING",
    /// Query program.
    Bytecode = 0x15 => "BYTECODE",
    Cardinality = 0x16 => "CARDINALITY",
    Column = 0x17 => "COLUMN",
    Direction = 0x18 => "DIRECTION",
    Operator = 0x19 => "OPERATOR",
    Order = 0x1A => "ORDER",
    Pick = 0x1B => "PICK",
    Pop = 0x1C => "POP",
    Lambda = 0x1D => "LAMBDA",
    P = 0x1E => "P",
    Scope = 0x1F => "SCOPE",
    T = 0x20 => "T",
    Traverser = 0x21 => "TRAVERSER",
    BigDecimal = 0x22 => "BIGDECIMAL",
    BigInteger = 0x23 => "BIGINTEGER",
    Byte = 0x24 => "BYTE",
    ByteBuffer = 0x25 => "BYTEBUFFER",
    Short = 0x26 => "SHORT",
    Boolean = 0x27 => "BOOLEAN",
    TextP = 0x28 => "TEXTP",
    TraversalStrategy = 0x29 => "TRAVERSALSTRATEGY",
    BulkSet = 0x2A => "BULKSET",
    Tree = 0x2B => "TREE",
    Metrics = 0x2C => "METRICS",
    TraversalMetrics = 0x2D => "TRAVERSALMETRICS",
    Char = 0x80 => "CHAR",
    Duration = 0x81 => "DURATION",
    InetAddress = 0x82 => "INETADDRESS",
    Instant = 0x83 => "INSTANT",
    LocalDate = 0x84 => "LOCALDATE",
    LocalDateTime = 0x85 => "LOCALDATETIME",
    LocalTime = 0x86 => "LOCALTIME",
    MonthDay = 0x87 => "MONTHDAY",
    OffsetDateTime = 0x88 => "OFFSETDATETIME",
    OffsetTime = 0x89 => "OFFSETTIME",
    Period = 0x8A => "PERIOD",
    Year = 0x8B => "YEAR",
    YearMonth = 0x8C => "YEARMONTH",
    ZonedDateTime = 0x8D => "ZONEDATETIME",
    ZoneOffset = 0x8E => "ZONEOFFSET",
    /// Null with no type information.
    UnspecifiedNull = 0xFE => "UNSPECIFIED_NULL",
}

impl DataType {
    /// The wire code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns true for codes that can not carry a built-in serializer.
    pub fn is_reserved(self) -> bool {
        matches!(self, DataType::Custom | DataType::UnspecifiedNull)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_lookup() {
        for data_type in DataType::ALL {
            assert_eq!(DataType::from_code(data_type.code()), Some(*data_type));
        }
    }

    #[test]
    fn reserved_codes() {
        assert_eq!(DataType::Custom.code(), 0x00);
        assert_eq!(DataType::UnspecifiedNull.code(), 0xFE);
        assert!(DataType::Custom.is_reserved());
        assert!(DataType::UnspecifiedNull.is_reserved());
        assert!(!DataType::Int.is_reserved());
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(DataType::from_code(0x7F), None);
        assert_eq!(DataType::from_code(0xFF), None);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(DataType::VertexProperty.to_string(), "VERTEXPROPERTY");
        assert_eq!(DataType::UnspecifiedNull.to_string(), "UNSPECIFIED_NULL");
    }
}
