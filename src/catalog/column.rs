//! Column model: one table field, its type and the closed set of properties it may carry
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base SQL type of a column, rendered lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Varchar,
    Decimal,
    Bool,
    Timestamp,
    Json,
    Text,
    Blob,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Varchar => "varchar",
            ColumnType::Decimal => "decimal",
            ColumnType::Bool => "bool",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Json => "json",
            ColumnType::Text => "text",
            ColumnType::Blob => "blob",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Explicit nullability. Absent means the database default (nullable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    NotNull,
    Null,
}

/// Target of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
}

impl ForeignKey {
    pub fn new(table: &str, column: &str, on_delete: Option<&str>, on_update: Option<&str>) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            on_delete: on_delete.map(|a| a.trim().to_lowercase()),
            on_update: on_update.map(|a| a.trim().to_lowercase()),
        }
    }
}

/// One member of a multi-column foreign key.
///
/// The referenced table and the referential actions are taken from the member that
/// closes the chain; every member contributes its own referenced column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeForeignKey {
    pub close_chain: bool,
    #[serde(flatten)]
    pub reference: ForeignKey,
}

/// Names of the recognised column properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyName {
    Size,
    NotNullable,
    Nullable,
    Default,
    Unsigned,
    AutoIncrement,
    OnUpdate,
    Unique,
    UniqueComposite,
    Primary,
    PrimaryComposite,
    Foreign,
    ForeignComposite,
}

/// Borrowed view of a property value returned by [`Column::property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue<'a> {
    Flag,
    Text(&'a str),
    Chain { close_chain: bool },
    Reference(&'a ForeignKey),
    CompositeReference(&'a CompositeForeignKey),
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullability: Option<Nullability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub unsigned: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub auto_increment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub unique: bool,
    /// `Some(close_chain)` when the column is part of a composite unique key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_composite: Option<bool>,
    #[serde(skip_serializing_if = "is_false")]
    pub primary: bool,
    /// `Some(close_chain)` when the column is part of a composite primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_composite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign: Option<ForeignKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_composite: Option<CompositeForeignKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
    #[serde(default)]
    properties: ColumnProperties,
}

impl Column {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            properties: ColumnProperties::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn properties(&self) -> &ColumnProperties {
        &self.properties
    }

    /// Type including the size suffix, e.g. `varchar(255)` or `decimal(11, 2)`.
    pub fn sql_type(&self) -> String {
        match &self.properties.size {
            Some(size) => format!("{}({})", self.column_type, size),
            None => self.column_type.to_string(),
        }
    }

    /// Look up a property by name. `None` means "not set", never "false".
    pub fn property(&self, name: PropertyName) -> Option<PropertyValue<'_>> {
        let p = &self.properties;
        let flag = |set: bool| set.then_some(PropertyValue::Flag);
        match name {
            PropertyName::Size => p.size.as_deref().map(PropertyValue::Text),
            PropertyName::NotNullable => flag(p.nullability == Some(Nullability::NotNull)),
            PropertyName::Nullable => flag(p.nullability == Some(Nullability::Null)),
            PropertyName::Default => p.default.as_deref().map(PropertyValue::Text),
            PropertyName::Unsigned => flag(p.unsigned),
            PropertyName::AutoIncrement => flag(p.auto_increment),
            PropertyName::OnUpdate => p.on_update.as_deref().map(PropertyValue::Text),
            PropertyName::Unique => flag(p.unique),
            PropertyName::UniqueComposite => p
                .unique_composite
                .map(|close_chain| PropertyValue::Chain { close_chain }),
            PropertyName::Primary => flag(p.primary),
            PropertyName::PrimaryComposite => p
                .primary_composite
                .map(|close_chain| PropertyValue::Chain { close_chain }),
            PropertyName::Foreign => p.foreign.as_ref().map(PropertyValue::Reference),
            PropertyName::ForeignComposite => p
                .foreign_composite
                .as_ref()
                .map(PropertyValue::CompositeReference),
        }
    }

    /// Primary key that MySQL keeps alive through the auto_increment requirement.
    pub fn is_auto_increment_primary(&self) -> bool {
        self.properties.primary && self.properties.auto_increment
    }

    /// Structural equality used by the diff: type and properties, name excluded.
    pub fn equals(&self, other: &Column) -> bool {
        self.column_type == other.column_type && self.properties == other.properties
    }

    /// Column definition without constraints:
    /// `<name> <type>[(size)] [unsigned] [not null|null] [default v] [on update v] [auto_increment]`
    pub fn declaration(&self) -> String {
        let p = &self.properties;
        let mut parts = vec![self.name.clone(), self.sql_type()];

        if p.unsigned {
            parts.push("unsigned".to_string());
        }
        match p.nullability {
            Some(Nullability::NotNull) => parts.push("not null".to_string()),
            Some(Nullability::Null) => parts.push("null".to_string()),
            None => {}
        }
        if let Some(default) = &p.default {
            parts.push(format!("default {}", default));
        }
        if let Some(on_update) = &p.on_update {
            parts.push(format!("on update {}", on_update));
        }
        if p.auto_increment {
            parts.push("auto_increment".to_string());
        }

        parts.join(" ")
    }

    pub fn size(&mut self, value: impl fmt::Display) -> &mut Self {
        self.properties.size = Some(value.to_string());
        self
    }

    pub fn default(&mut self, value: impl fmt::Display) -> &mut Self {
        self.properties.default = Some(value.to_string());
        self
    }

    pub fn unsigned(&mut self) -> &mut Self {
        self.properties.unsigned = true;
        self
    }

    pub fn auto_increment(&mut self) -> &mut Self {
        self.properties.auto_increment = true;
        self
    }

    pub fn not_nullable(&mut self) -> &mut Self {
        self.properties.nullability = Some(Nullability::NotNull);
        self
    }

    /// Explicit `null`, needed for timestamp columns that MySQL would otherwise make not null.
    pub fn nullable(&mut self) -> &mut Self {
        self.properties.nullability = Some(Nullability::Null);
        self
    }

    pub fn on_update(&mut self, value: impl fmt::Display) -> &mut Self {
        self.properties.on_update = Some(value.to_string());
        self
    }

    pub fn unique(&mut self) -> &mut Self {
        self.properties.unique = true;
        self
    }

    pub fn unique_composite(&mut self, close_chain: bool) -> &mut Self {
        self.properties.unique_composite = Some(close_chain);
        self
    }

    pub fn primary(&mut self) -> &mut Self {
        self.properties.primary = true;
        self
    }

    pub fn primary_composite(&mut self, close_chain: bool) -> &mut Self {
        self.properties.primary_composite = Some(close_chain);
        self
    }

    pub fn references(
        &mut self,
        table: &str,
        column: &str,
        on_delete: Option<&str>,
        on_update: Option<&str>,
    ) -> &mut Self {
        self.properties.foreign = Some(ForeignKey::new(table, column, on_delete, on_update));
        self
    }

    pub fn references_composite(
        &mut self,
        column: &str,
        close_chain: bool,
        table: &str,
        on_delete: Option<&str>,
        on_update: Option<&str>,
    ) -> &mut Self {
        self.properties.foreign_composite = Some(CompositeForeignKey {
            close_chain,
            reference: ForeignKey::new(table, column, on_delete, on_update),
        });
        self
    }
}
