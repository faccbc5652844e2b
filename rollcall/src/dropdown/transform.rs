use pagedom::element::{find_element, replace_element};
use pagedom::{query_all, query_first, Element, Selector};

use super::{
    trigger_content, DropdownInstance, DropdownOption, LIST_CLASS, OPTION_CLASS, TRIGGER_CLASS,
    WRAPPER_CLASS,
};
use crate::error::TransformError;
use crate::events::CommitCallback;

/// Replace the native `<select>` with id `id` by a custom dropdown.
///
/// The select's `name` (or its id when unnamed) moves to the hidden field so
/// form submission is unchanged. The initial selection is the option marked
/// `selected`, else the first option.
pub fn transform_select(
    root: &mut Element,
    id: &str,
    on_commit: Option<CommitCallback>,
) -> Result<DropdownInstance, TransformError> {
    let select = match find_element(root, id) {
        Some(el) if el.tag.eq_ignore_ascii_case("select") => el,
        found => {
            return Err(TransformError::NotSelectLike {
                id: id.to_string(),
                found: found.map(|el| el.tag.clone()),
            });
        }
    };

    let options: Vec<DropdownOption> = query_all(select, &Selector::tag("option"))
        .into_iter()
        .map(|opt| {
            let label = opt.text_content().trim().to_string();
            let value = opt.get_attr("value").map(str::to_string).unwrap_or_else(|| label.clone());
            DropdownOption { value, label }
        })
        .collect();
    if options.is_empty() {
        return Err(TransformError::NoOptions(id.to_string()));
    }

    let selected_index = query_all(select, &Selector::tag("option"))
        .iter()
        .position(|opt| opt.attrs.contains_key("selected"))
        .unwrap_or(0);
    let initial = options[selected_index].clone();

    let name = select.get_attr("name").unwrap_or(id).to_string();
    let trigger_class = select.get_data("trigger-class").map(str::to_string);

    let wrapper_id = format!("wrapper-{id}");
    let hidden_id = format!("value-{id}");
    let trigger_id = format!("button-{id}");
    let list_id = format!("list-{id}");

    let mut trigger = Element::div()
        .id(&trigger_id)
        .class(TRIGGER_CLASS)
        .children(trigger_content(&trigger_id, &initial.label));
    if let Some(classes) = trigger_class {
        trigger = trigger.classes(&classes);
    }

    let items = options.iter().enumerate().map(|(i, opt)| {
        Element::li()
            .id(format!("{list_id}-opt-{i}"))
            .class(OPTION_CLASS)
            .data("value", &opt.value)
            .text(&opt.label)
    });

    let wrapper = Element::div()
        .id(&wrapper_id)
        .classes(WRAPPER_CLASS)
        .child(
            Element::hidden_input(&initial.value)
                .id(&hidden_id)
                .attr("name", name),
        )
        .child(trigger)
        .child(Element::ul().id(&list_id).class(LIST_CLASS).children(items));

    if replace_element(root, id, wrapper).is_none() {
        return Err(TransformError::Detached(id.to_string()));
    }

    log::debug!(
        "transform_select id={} options={} initial={:?}",
        id,
        options.len(),
        initial.value
    );

    Ok(DropdownInstance {
        id: id.to_string(),
        wrapper_id,
        trigger_id,
        list_id,
        hidden_id,
        options,
        current_value: initial.value,
        on_commit,
    })
}

/// Bind a dropdown that was rendered directly in custom form.
///
/// The wrapper must contain a hidden input, a `.custom-select` trigger and a
/// `.options-list` of `.option-item[data-value]` entries. The instance id is
/// the wrapper id and the current value is read from the hidden input.
pub fn adopt_dropdown(
    root: &Element,
    wrapper_id: &str,
    on_commit: Option<CommitCallback>,
) -> Result<DropdownInstance, TransformError> {
    let missing = |part| TransformError::MissingPart {
        wrapper: wrapper_id.to_string(),
        part,
    };

    let wrapper = find_element(root, wrapper_id).ok_or_else(|| missing("wrapper"))?;
    let hidden = query_first(
        wrapper,
        &Selector::tag("input").and(Selector::attr("type", "hidden")),
    )
    .ok_or_else(|| missing("hidden field"))?;
    let trigger =
        query_first(wrapper, &Selector::class(TRIGGER_CLASS)).ok_or_else(|| missing("trigger"))?;
    let list =
        query_first(wrapper, &Selector::class(LIST_CLASS)).ok_or_else(|| missing("option list"))?;

    let options: Vec<DropdownOption> = query_all(list, &Selector::class(OPTION_CLASS))
        .into_iter()
        .map(|item| DropdownOption {
            value: item.get_data("value").unwrap_or_default().to_string(),
            label: item.text_content().trim().to_string(),
        })
        .collect();
    if options.is_empty() {
        return Err(TransformError::NoOptions(wrapper_id.to_string()));
    }

    Ok(DropdownInstance {
        id: wrapper_id.to_string(),
        wrapper_id: wrapper_id.to_string(),
        trigger_id: trigger.id.clone(),
        list_id: list.id.clone(),
        hidden_id: hidden.id.clone(),
        options,
        current_value: hidden.value().to_string(),
        on_commit,
    })
}
