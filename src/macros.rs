// ABOUTME: This module provides macros to reduce boilerplate in the SMPP command tables
// ABOUTME: A single declarative table expands into CommandDef values with typed, filtered fields

macro_rules! field_default {
    (unset) => {
        $crate::defs::FieldDefault::Unset
    };
    ($value:literal) => {
        $crate::defs::FieldDefault::Value($crate::types::Value::Int($value))
    };
}

/// Macro for declaring command schemas in wire order
///
/// Each entry names the command, its numeric id and its mandatory fields.
/// A field may carry an integer default (`= 0x50`), or `= unset` to be left
/// out of PDUs unless the caller sets it, and a filter (`[Time]`).
/// An optional `remap { tlv => field }` block renames TLVs for that command.
///
/// # Arguments
/// * `$name` - Command name as used on the wire and in the registry
/// * `$id` - The command_id value
/// * `$field: $ty` - Field name and `WireType` variant
///
/// # Generated code
/// A `Vec<CommandDef>` built with the `CommandDef`/`FieldDef` builders:
/// ```rust,ignore
/// CommandDef::new(0x00000015, "enquire_link")
/// ```
macro_rules! command_table {
    ($(
        $name:ident = $id:literal {
            $( $field:ident : $ty:ident $(= $default:tt)? $([$filter:ident])? ),* $(,)?
        }
        $( remap { $( $from:ident => $to:ident ),* $(,)? } )?
        ;
    )*) => {
        vec![$(
            $crate::defs::CommandDef::new($id, stringify!($name))
                $(
                    .field(
                        $crate::defs::FieldDef::new(
                            stringify!($field),
                            $crate::types::WireType::$ty,
                        )
                        $( .with_default(field_default!($default)) )?
                        $( .with_filter($crate::filters::Filter::$filter) )?
                    )
                )*
                $( $( .remap(stringify!($from), stringify!($to)) )* )?
        ),*]
    };
}
