//! Step definitions for combine scenarios.

use anyhow::{Result, anyhow, bail, ensure};
use ortho_combine::{
    Update, UsageError, Value, chain, combine, combine_all, ignore, opaque, remove, replace,
    transform, warnings::MULTIPLE_UPDATES,
};
use rstest_bdd_macros::{given, then, when};
use test_helpers::{json, text::unquote, warnings};

use crate::fixtures::CombineState;

fn base_of(state: &CombineState) -> Result<Value> {
    state
        .base
        .with_ref(|base| base.clone())
        .ok_or_else(|| anyhow!("base value should be set"))
}

fn merged_of(state: &CombineState) -> Result<Value> {
    let result = state
        .result
        .with_ref(|result| result.clone())
        .ok_or_else(|| anyhow!("no combine has run"))?;
    result.map_err(|err| anyhow!("combine failed: {err}"))
}

fn apply(state: &CombineState, update: &Update) -> Result<()> {
    let base = base_of(state)?;
    state.result.set(combine(&base, update));
    Ok(())
}

fn presence_report() -> Update {
    transform(|position| {
        Ok(Update::from(if position.is_present() {
            "present"
        } else {
            "absent"
        }))
    })
}

#[given("the base value {base}")]
fn base_value(combine_state: &CombineState, base: String) -> Result<()> {
    combine_state.base.set(json::value(json::parse(&base)?));
    Ok(())
}

#[when("the base is combined with {update}")]
fn combine_literal(combine_state: &CombineState, update: String) -> Result<()> {
    apply(combine_state, &json::update(json::parse(&update)?))
}

#[when("the outcome is combined with {update}")]
fn combine_outcome(combine_state: &CombineState, update: String) -> Result<()> {
    let previous = merged_of(combine_state)?;
    combine_state.base.set(previous);
    apply(combine_state, &json::update(json::parse(&update)?))
}

#[when("the {key} key is removed")]
fn remove_key(combine_state: &CombineState, key: String) -> Result<()> {
    apply(combine_state, &Update::map([(unquote(&key), remove())]))
}

#[when("the {key} key is ignored")]
fn ignore_key(combine_state: &CombineState, key: String) -> Result<()> {
    apply(combine_state, &Update::map([(unquote(&key), ignore())]))
}

#[when("the {key} key is replaced with {value}")]
fn replace_key(combine_state: &CombineState, key: String, value: String) -> Result<()> {
    let payload = json::value(json::parse(&value)?);
    apply(
        combine_state,
        &Update::map([(unquote(&key), replace(payload))]),
    )
}

#[when("the {key} key is cleared then reported by a transform")]
fn clear_then_report(combine_state: &CombineState, key: String) -> Result<()> {
    let steps = chain([remove(), presence_report()]);
    apply(combine_state, &Update::map([(unquote(&key), steps)]))
}

#[when("a transform reports the presence of the {key} key")]
fn report_presence(combine_state: &CombineState, key: String) -> Result<()> {
    apply(
        combine_state,
        &Update::map([(unquote(&key), presence_report())]),
    )
}

#[when("the base is replaced by the opaque value {value}")]
fn replace_with_opaque(combine_state: &CombineState, value: String) -> Result<()> {
    apply(combine_state, &opaque(json::value(json::parse(&value)?)))
}

#[when("the root is removed")]
fn remove_root(combine_state: &CombineState) -> Result<()> {
    apply(combine_state, &remove())
}

#[when("the updates {first} and {second} are applied together")]
fn apply_together(combine_state: &CombineState, first: String, second: String) -> Result<()> {
    let guard = warnings::capture();
    let updates = [
        json::update(json::parse(&first)?),
        json::update(json::parse(&second)?),
    ];
    let base = base_of(combine_state)?;
    combine_state.result.set(combine_all(&base, &updates));
    combine_state.warned.set(guard.fired(MULTIPLE_UPDATES));
    Ok(())
}

#[then("the merged value is {expected}")]
fn merged_value_is(combine_state: &CombineState, expected: String) -> Result<()> {
    let merged = merged_of(combine_state)?.to_json();
    let expected = json::parse(&expected)?;
    ensure!(
        merged == expected,
        "unexpected merged value {merged}; expected {expected}"
    );
    Ok(())
}

#[then("the {key} key still shares the base value")]
fn key_shares_base(combine_state: &CombineState, key: String) -> Result<()> {
    let base = base_of(combine_state)?;
    let merged = merged_of(combine_state)?;
    let name = unquote(&key);
    let (Some(before), Some(after)) = (base.named(name), merged.named(name)) else {
        bail!("key {name} missing from the base or the merged value");
    };
    ensure!(before.is_same(after), "key {name} was reallocated");
    Ok(())
}

#[then("the combine fails because the root was removed")]
fn root_removal_rejected(combine_state: &CombineState) -> Result<()> {
    let kind = combine_state
        .result
        .with_ref(|result| result.as_ref().err().and_then(|err| err.usage_kind()))
        .flatten();
    ensure!(
        kind == Some(UsageError::RootRemoved),
        "expected a root removal error, got {kind:?}"
    );
    Ok(())
}

#[then("the multiple updates warning is recorded")]
fn multiple_updates_warned(combine_state: &CombineState) -> Result<()> {
    ensure!(
        combine_state.warned.get() == Some(true),
        "expected the multiple updates warning to fire"
    );
    Ok(())
}
