//! Interactive invoice session: one bill, edited through prompts until the
//! user prints it or quits.

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use inquire::{Confirm, CustomType, InquireError, Select, Text};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::bill::{ApplyError, Bill};
use crate::config::{load_seller_config, load_tax_config};
use crate::editor::{Field, ItemEditor};
use crate::error::{InvoiceError, Result};
use crate::model::{BuyerDetails, ItemId, SellerConfig, TaxConfig, Unit};
use crate::print::{preview_bill, print_bill};
use crate::render::{Renderer, format_inr};
use crate::words::amount_to_words;

const BRAND: Color = Color::Rgb { r: 33, g: 150, b: 243 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Buyer,
    AddItem,
    EditItem,
    DeleteItem,
    Note,
    Show,
    Preview,
    Print,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Buyer => "👤 Buyer Details",
            Action::AddItem => "➕ Add Item",
            Action::EditItem => "✏️  Edit Item",
            Action::DeleteItem => "🗑️  Delete Item",
            Action::Note => "📝 Note",
            Action::Show => "📋 Show Bill",
            Action::Preview => "👀 Preview Bill",
            Action::Print => "🖨️  Print Bill",
            Action::Quit => "🚪 Quit",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RateEntry {
    WithoutTax,
    WithTax,
}

impl fmt::Display for RateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateEntry::WithoutTax => f.write_str("Rate without tax"),
            RateEntry::WithTax => f.write_str("Rate with tax (SGST + CGST included)"),
        }
    }
}

pub struct Session {
    bill: Bill,
    seller: SellerConfig,
    tax: TaxConfig,
    renderer: Renderer,
    output_root: PathBuf,
}

impl Session {
    pub fn new(root: &Path) -> Result<Self> {
        let session = Session {
            bill: Bill::start(),
            seller: load_seller_config(root)?,
            tax: load_tax_config(root)?,
            renderer: Renderer::for_root(root)?,
            output_root: root.join("output"),
        };
        debug!("session started for {}", session.bill.bill_number());
        Ok(session)
    }

    pub fn run(&mut self) -> Result<()> {
        println!("\n🧾 Invoice {} ({})", self.bill.bill_number(), self.seller.company_name);

        loop {
            let mut actions = vec![Action::Buyer, Action::AddItem];
            if !self.bill.is_empty() {
                actions.extend([Action::EditItem, Action::DeleteItem]);
            }
            actions.extend([Action::Note, Action::Show]);
            if !self.bill.is_empty() {
                actions.extend([Action::Preview, Action::Print]);
            }
            actions.push(Action::Quit);

            let action = match Select::new("What next?", actions).prompt() {
                Ok(a) => a,
                Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Action::Quit,
                Err(e) => return Err(e.into()),
            };

            if action == Action::Quit {
                if self.confirm_quit()? {
                    return Ok(());
                }
                continue;
            }

            match self.perform(action) {
                Ok(()) => {}
                Err(InvoiceError::Prompt(InquireError::OperationCanceled)) => println!("Cancelled"),
                Err(InvoiceError::Prompt(InquireError::OperationInterrupted)) => return Ok(()),
                Err(e) => println!("❌ Error: {}", e),
            }
        }
    }

    fn confirm_quit(&self) -> Result<bool> {
        if self.bill.is_empty() {
            return Ok(true);
        }
        match Confirm::new("Invoices are not saved. Quit and discard this bill?")
            .with_default(false)
            .prompt()
        {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled) => Ok(false),
            Err(InquireError::OperationInterrupted) => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    fn perform(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Buyer => self.edit_buyer(),
            Action::AddItem => self.add_item(),
            Action::EditItem => self.edit_item(),
            Action::DeleteItem => self.delete_item(),
            Action::Note => self.edit_note(),
            Action::Show => {
                self.show_bill();
                Ok(())
            }
            Action::Preview => self.preview(),
            Action::Print => self.print(),
            Action::Quit => Ok(()),
        }
    }

    // ==========================================
    // Buyer & Note
    // ==========================================

    fn edit_buyer(&mut self) -> Result<()> {
        println!("\n--- Buyer Details ---");
        let current = self.bill.buyer().clone();
        let buyer = BuyerDetails {
            name: Text::new("Company/Customer Name:").with_initial_value(&current.name).prompt()?,
            address: Text::new("Address:").with_initial_value(&current.address).prompt()?,
            gst_number: Text::new("GST Number:").with_initial_value(&current.gst_number).prompt()?,
            phone: Text::new("Phone:").with_initial_value(&current.phone).prompt()?,
            email: Text::new("Email:").with_initial_value(&current.email).prompt()?,
        };
        self.bill.set_buyer(buyer);
        println!("✅ Buyer details updated.");
        Ok(())
    }

    fn edit_note(&mut self) -> Result<()> {
        let current = self.bill.note().unwrap_or_default().to_string();
        let note = Text::new("Note (leave empty to remove):")
            .with_initial_value(&current)
            .prompt()?;
        self.bill.set_note(note);
        match self.bill.note() {
            Some(_) => println!("✅ Note saved."),
            None => println!("✅ Note removed."),
        }
        Ok(())
    }

    // ==========================================
    // Items
    // ==========================================

    fn add_item(&mut self) -> Result<()> {
        println!("\n--- Add Item ---");
        let mut editor = ItemEditor::new(&self.tax);
        let id = self.run_editor(&mut editor)?;
        if let Some(item) = self.bill.item(id) {
            println!("✅ Added: {} ({})", item.fields.description, format_inr(item.fields.amount));
        }
        self.print_totals();
        Ok(())
    }

    fn edit_item(&mut self) -> Result<()> {
        let id = self.select_item("Select Item to Edit:")?;
        let Some(item) = self.bill.item(id) else {
            return Ok(());
        };
        println!("\n--- Edit Item ---");
        let mut editor = ItemEditor::for_item(item);
        self.run_editor(&mut editor)?;
        println!("✅ Item updated.");
        self.print_totals();
        Ok(())
    }

    fn delete_item(&mut self) -> Result<()> {
        let id = self.select_item("Select Item to Delete:")?;
        if let Some(removed) = self.bill.delete_item(id) {
            println!("🗑️  Deleted: {}", removed.fields.description);
        }
        if self.bill.is_empty() {
            print_empty_placeholder();
        }
        self.print_totals();
        Ok(())
    }

    fn select_item(&self, message: &str) -> Result<ItemId> {
        let options: Vec<String> = self
            .bill
            .items()
            .iter()
            .enumerate()
            .map(|(n, item)| {
                format!(
                    "{}. {} ({} {}, {})",
                    n + 1,
                    item.fields.description,
                    item.fields.quantity,
                    item.fields.unit,
                    format_inr(item.fields.amount)
                )
            })
            .collect();
        let choice = Select::new(message, options).with_page_size(10).raw_prompt()?;
        Ok(self.bill.items()[choice.index].id)
    }

    /// Prompts every field once, then only the fields that failed validation
    /// until the editor is accepted by the bill.
    fn run_editor(&mut self, editor: &mut ItemEditor) -> Result<ItemId> {
        let mut fields: Vec<Field> = vec![
            Field::Description,
            Field::HsnCode,
            Field::Quantity,
            Field::Unit,
            Field::Sgst,
            Field::Cgst,
            Field::Rate,
        ];

        loop {
            for field in &fields {
                prompt_field(editor, *field)?;
            }
            println!(
                "   Rate with tax: {} | Amount without tax: {}",
                format_inr(editor.rate_with_tax()),
                format_inr(editor.amount())
            );

            match self.bill.apply(editor) {
                Ok(id) => return Ok(id),
                Err(ApplyError::Invalid(errors)) => {
                    for (field, message) in errors.iter() {
                        println!("❌ {}: {}", field.label(), message);
                    }
                    fields = errors.iter().map(|(field, _)| field).collect();
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    // ==========================================
    // Display & Output
    // ==========================================

    fn show_bill(&self) {
        println!("\n--- {} | {} ---", self.bill.bill_number(), self.bill.date().format("%-d/%-m/%Y"));
        let buyer = self.bill.buyer();
        if buyer.name.is_empty() {
            println!("Buyer: (none)");
        } else {
            println!("Buyer: {}", buyer.name);
        }

        if self.bill.is_empty() {
            print_empty_placeholder();
        } else {
            println!("{}", items_table(&self.bill));
        }
        self.print_totals();
        if let Some(note) = self.bill.note() {
            println!("Note: {}", note);
        }
    }

    fn print_totals(&self) {
        println!("{}", totals_table(&self.bill));
    }

    fn preview(&self) -> Result<()> {
        let (path, opened) = preview_bill(&self.renderer, &self.bill, &self.seller, &self.output_root)?;
        println!("👀 Preview: {:?}", path);
        if !opened {
            println!("   (open the file above in a browser to view it)");
        }
        Ok(())
    }

    fn print(&self) -> Result<()> {
        let (path, opened) = print_bill(&self.renderer, &self.bill, &self.seller, &self.output_root)?;
        if opened {
            println!("🖨️  Sent to viewer: {:?}", path);
        } else {
            debug!("viewer unavailable, document left at {}", path.display());
        }
        Ok(())
    }
}

fn prompt_field(editor: &mut ItemEditor, field: Field) -> Result<()> {
    let label = format!("{}:", field.label());
    match field {
        Field::Description => {
            let value = Text::new(&label).with_initial_value(editor.description()).prompt()?;
            editor.set_description(value);
        }
        Field::HsnCode => {
            let value = Text::new(&label).with_initial_value(editor.hsn_code()).prompt()?;
            editor.set_hsn_code(value);
        }
        Field::Quantity => {
            let value = CustomType::<f64>::new(&label)
                .with_default(editor.quantity())
                .with_error_message("Please type a number")
                .prompt()?;
            editor.set_quantity(value);
        }
        Field::Unit => {
            let cursor = Unit::ALL.iter().position(|u| *u == editor.unit()).unwrap_or(0);
            let unit = Select::new(&label, Unit::ALL.to_vec())
                .with_starting_cursor(cursor)
                .prompt()?;
            editor.set_unit(unit);
        }
        Field::Cgst => {
            let value = Text::new(&label).with_initial_value(editor.cgst()).prompt()?;
            editor.set_cgst(value);
        }
        Field::Sgst => {
            let value = Text::new(&label).with_initial_value(editor.sgst()).prompt()?;
            editor.set_sgst(value);
        }
        Field::Rate | Field::RateWithTax => {
            let entry = Select::new("Enter price as:", vec![RateEntry::WithoutTax, RateEntry::WithTax]).prompt()?;
            match entry {
                RateEntry::WithoutTax => {
                    let value = CustomType::<f64>::new("Rate (Without Tax) ₹:")
                        .with_default(editor.rate())
                        .with_error_message("Please type a number")
                        .prompt()?;
                    editor.set_rate(value);
                }
                RateEntry::WithTax => {
                    let value = CustomType::<f64>::new("Rate (With Tax) ₹:")
                        .with_default(editor.rate_with_tax())
                        .with_error_message("Please type a number")
                        .prompt()?;
                    editor.set_rate_with_tax(value);
                }
            }
        }
    }
    Ok(())
}

fn print_empty_placeholder() {
    println!("(No items added yet. Use \"Add Item\" to get started.)");
}

fn items_table(bill: &Bill) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Items"),
        Cell::new("HSN/SAC"),
        Cell::new("Qty/Unit"),
        Cell::new("Rate (Excl. Tax)"),
        Cell::new("Rate (Incl. Tax)"),
        Cell::new("Amount"),
        Cell::new("CGST"),
        Cell::new("SGST"),
        Cell::new("Total"),
    ]);

    for (n, item) in bill.items().iter().enumerate() {
        let f = &item.fields;
        table.add_row(vec![
            Cell::new(n + 1),
            Cell::new(&f.description),
            Cell::new(&f.hsn_code),
            Cell::new(format!("{} {}", f.quantity, f.unit)),
            money_cell(f.rate),
            money_cell(f.rate_with_tax),
            money_cell(f.amount),
            money_cell(item.cgst_amount()).add_attribute(Attribute::Dim),
            money_cell(item.sgst_amount()).add_attribute(Attribute::Dim),
            money_cell(item.line_total()).add_attribute(Attribute::Bold),
        ]);
    }
    table
}

fn totals_table(bill: &Bill) -> Table {
    let totals = bill.totals();
    let mut table = Table::new();
    table.add_row(vec![Cell::new("Subtotal"), money_cell(totals.subtotal)]);
    table.add_row(vec![Cell::new("CGST"), money_cell(totals.cgst)]);
    table.add_row(vec![Cell::new("SGST"), money_cell(totals.sgst)]);
    table.add_row(vec![
        Cell::new("Total Amount").add_attribute(Attribute::Bold).fg(BRAND),
        money_cell(totals.total).add_attribute(Attribute::Bold).fg(BRAND),
    ]);
    table.add_row(vec![Cell::new("In Words"), Cell::new(amount_to_words(totals.total))]);
    table
}

fn money_cell(amount: f64) -> Cell {
    Cell::new(format_inr(amount)).set_alignment(CellAlignment::Right)
}
